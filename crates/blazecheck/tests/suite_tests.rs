//! Every scenario case, run through the harness against the simulated store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use blazecheck::prelude::*;
use blazecheck::suite;
use std::sync::Arc;

fn harness() -> (Harness, Arc<Reporter>) {
    let reporter = Arc::new(Reporter::new().with_name("simulated"));
    let config = HarnessConfig::simulated().with_capture_artifacts(false);
    let harness = Harness::with_factory(config, Arc::new(SimulatedFactory::new()))
        .with_sink(reporter.clone());
    (harness, reporter)
}

async fn run(id: &str) -> ScenarioRecord {
    let (harness, _) = harness();
    let case = suite::find(id).unwrap_or_else(|| panic!("no case {id}"));
    let record = harness.run_case(&case).await;
    assert_eq!(
        record.status,
        TestStatus::Passed,
        "{id} failed: {:?}\nsteps: {:#?}",
        record.error,
        record.steps
    );
    record
}

mod example_tests {
    use super::*;

    #[tokio::test]
    async fn test_product_details_show_price_with_tax() {
        let record = run("home.samsung_s6_details").await;
        assert!(record
            .steps
            .iter()
            .any(|s| s.description.contains("$360 *includes tax")));
    }

    #[tokio::test]
    async fn test_add_to_cart_consumes_alert() {
        let record = run("cart.add_product").await;
        let alert_step = record
            .steps
            .iter()
            .find(|s| s.description.contains("alert"))
            .unwrap();
        assert_eq!(alert_step.keyword, Keyword::Then);
        assert_eq!(alert_step.status, StepStatus::Passed);
    }

    #[tokio::test]
    async fn test_delete_first_product() {
        run("cart.delete_first").await;
    }

    #[tokio::test]
    async fn test_delete_first_needs_both_rows_listed() {
        let samsung_cell = blazecheck::screen::cart::PRODUCT_CELL.bind("Samsung galaxy s6");
        let factory = SimulatedFactory::with_builder(
            SimulatedStorefront::builder()
                .fault(Fault::MissingElement(samsung_cell.selector().clone())),
        );
        let config = HarnessConfig::simulated().with_capture_artifacts(false);
        let harness = Harness::with_factory(config, Arc::new(factory));
        let record = harness
            .run_case(&suite::find("cart.delete_first").unwrap())
            .await;

        assert_eq!(record.status, TestStatus::Failed);
        let listed = record
            .steps
            .iter()
            .find(|s| s.description == "both products are listed")
            .unwrap();
        assert_eq!(listed.status, StepStatus::Failed);
        assert!(!record
            .steps
            .iter()
            .any(|s| s.description == "I delete the first product" && s.status == StepStatus::Passed));
    }

    #[tokio::test]
    async fn test_place_order() {
        run("order.place_valid").await;
    }

    #[tokio::test]
    async fn test_empty_contact_message() {
        run("contact.send_empty").await;
    }
}

mod full_catalog_tests {
    use super::*;

    #[tokio::test]
    async fn test_every_case_passes_sequentially() {
        let (harness, reporter) = harness();
        let cases = suite::all();
        let records = harness.run_cases(&cases, 1).await;
        assert_eq!(records.len(), cases.len());
        for record in &records {
            assert_eq!(
                record.status,
                TestStatus::Passed,
                "{}: {:?}",
                record.name,
                record.error
            );
            assert_eq!(record.states.last(), Some(&ScenarioState::SessionReleased));
        }
        assert!(reporter.all_passed());
        assert_eq!(reporter.total_count(), cases.len());
    }

    #[tokio::test]
    async fn test_parallel_lanes_keep_case_order() {
        let (harness, _) = harness();
        let cases = CaseFilter::new().tag("smoke").apply(suite::all());
        let records = harness.run_cases(&cases, 4).await;
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        let expected: Vec<_> = cases.iter().map(|c| c.name).collect();
        assert_eq!(names, expected);
        assert!(records.iter().all(|r| r.status.is_passed()));
    }
}
