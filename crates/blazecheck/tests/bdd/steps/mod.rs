//! Step definitions, one module per feature file.

mod cart;
mod contact;
mod home;
mod order;

use blazecheck::catalog::{self, Product};
use cucumber::gherkin::Step;
use std::collections::HashMap;

/// Catalog entry for a product named in a step
pub fn product(name: &str) -> &'static Product {
    catalog::product(name).unwrap_or_else(|| panic!("'{name}' is not in the catalog"))
}

/// A two-column `| field | value |` table as a map
pub fn fields(step: &Step) -> HashMap<String, String> {
    let table = step
        .table
        .as_ref()
        .unwrap_or_else(|| panic!("step '{}' needs a data table", step.value));
    table
        .rows
        .iter()
        .filter(|row| row.len() >= 2)
        .map(|row| (row[0].trim().to_lowercase(), row[1].trim().to_string()))
        .collect()
}
