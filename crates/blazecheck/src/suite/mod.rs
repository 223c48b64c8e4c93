//! The regression scenarios.
//!
//! Each [`ScenarioCase`] pairs a stable id and display name with a body that
//! drives the screens through a [`Sequencer`]. The same cases run on the
//! simulated store in this crate's tests and against the live store from
//! the CLI.

pub mod cart;
pub mod contact;
pub mod home;
pub mod order;

use crate::catalog::{alerts, Product};
use crate::dialog::AlertExpectation;
use crate::result::{CheckError, CheckResult};
use crate::screen::{HomeScreen, Screen};
use crate::sequencer::Sequencer;
use crate::session::Session;
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Future returned by a scenario body
pub type ScenarioFuture = BoxFuture<'static, CheckResult<()>>;

/// Scenario body
pub type ScenarioFn = fn(Session, Sequencer) -> ScenarioFuture;

/// Feature area a case belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    /// Home page, navigation and product details
    Home,
    /// Cart
    Cart,
    /// Contact modal
    Contact,
    /// Checkout
    Order,
}

impl Suite {
    /// Every suite
    pub const ALL: [Self; 4] = [Self::Home, Self::Cart, Self::Contact, Self::Order];
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Home => "home",
            Self::Cart => "cart",
            Self::Contact => "contact",
            Self::Order => "order",
        };
        f.write_str(s)
    }
}

impl FromStr for Suite {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "cart" => Ok(Self::Cart),
            "contact" => Ok(Self::Contact),
            "order" => Ok(Self::Order),
            other => Err(CheckError::config(format!(
                "unknown suite '{other}' (expected home, cart, contact or order)"
            ))),
        }
    }
}

/// One runnable scenario
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCase {
    /// Stable id, `<suite>.<slug>`
    pub id: &'static str,
    /// Display name used in logs and reports
    pub name: &'static str,
    /// Feature area
    pub suite: Suite,
    /// Free-form tags such as `smoke`
    pub tags: &'static [&'static str],
    /// Body
    pub run: ScenarioFn,
}

impl ScenarioCase {
    /// Create a case
    #[must_use]
    pub const fn new(
        id: &'static str,
        name: &'static str,
        suite: Suite,
        tags: &'static [&'static str],
        run: ScenarioFn,
    ) -> Self {
        Self {
            id,
            name,
            suite,
            tags,
            run,
        }
    }

    /// Whether the case carries `tag`
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Every case, grouped by suite in [`Suite::ALL`] order
#[must_use]
pub fn all() -> Vec<ScenarioCase> {
    let mut cases = home::cases();
    cases.extend(cart::cases());
    cases.extend(contact::cases());
    cases.extend(order::cases());
    cases
}

/// Look a case up by id
#[must_use]
pub fn find(id: &str) -> Option<ScenarioCase> {
    all().into_iter().find(|c| c.id == id)
}

/// Selects cases by suite, tag and name substring; empty matches all
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    suites: Vec<Suite>,
    tags: Vec<String>,
    name: Option<String>,
}

impl CaseFilter {
    /// Filter matching every case
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to `suite` (repeatable, OR-ed)
    #[must_use]
    pub fn suite(mut self, suite: Suite) -> Self {
        self.suites.push(suite);
        self
    }

    /// Require `tag` (repeatable, AND-ed)
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Require id or name to contain `needle`, ignoring case
    #[must_use]
    pub fn name(mut self, needle: impl Into<String>) -> Self {
        self.name = Some(needle.into().to_lowercase());
        self
    }

    /// Whether `case` passes
    #[must_use]
    pub fn matches(&self, case: &ScenarioCase) -> bool {
        let suite_ok = self.suites.is_empty() || self.suites.contains(&case.suite);
        let tags_ok = self.tags.iter().all(|t| case.has_tag(t));
        let name_ok = self.name.as_ref().map_or(true, |needle| {
            case.id.to_lowercase().contains(needle) || case.name.to_lowercase().contains(needle)
        });
        suite_ok && tags_ok && name_ok
    }

    /// Matching cases of `cases`, order kept
    #[must_use]
    pub fn apply(&self, cases: Vec<ScenarioCase>) -> Vec<ScenarioCase> {
        cases.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Open a product, add it to the cart, consume the confirmation dialog and
/// go back home.
pub(crate) async fn add_to_cart(
    seq: &mut Sequencer,
    home: &HomeScreen,
    product: &Product,
) -> CheckResult<HomeScreen> {
    let details = seq
        .when(
            format!("I click on \"{}\" product", product.name),
            home.click_product(product.name),
        )
        .await?;
    seq.and("I click on \"Add to cart\" button", details.click_add_to_cart())
        .await?;
    seq.then_alert(
        details.session(),
        AlertExpectation::containing(alerts::PRODUCT_ADDED),
    )
    .await?;
    seq.and("I return to the home page", details.click_home())
        .await
}
