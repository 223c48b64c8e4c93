//! Verdicts the BDD world reports for each way cucumber can end a scenario.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "bdd/world.rs"]
#[allow(dead_code)]
mod world;

use blazecheck::{ErrorKind, ScenarioState, TestStatus};
use cucumber::event::ScenarioFinished;
use std::sync::Arc;
use world::{StepOutcome, StoreWorld};

// ============================================================================
// Event mapping
// ============================================================================

#[test]
fn test_skipped_step_is_unmatched() {
    assert_eq!(
        StepOutcome::from_event(&ScenarioFinished::StepSkipped),
        StepOutcome::Unmatched
    );
}

#[test]
fn test_passed_and_hook_failure() {
    assert_eq!(
        StepOutcome::from_event(&ScenarioFinished::StepPassed),
        StepOutcome::Passed
    );
    assert_eq!(
        StepOutcome::from_event(&ScenarioFinished::BeforeHookFailed(Arc::new("boom"))),
        StepOutcome::Failed
    );
}

// ============================================================================
// Conclusion
// ============================================================================

#[tokio::test]
async fn test_unmatched_step_does_not_pass() {
    let mut world = StoreWorld::new();
    world.start("Cart total in an unknown unit").await;
    let record = world.conclude(StepOutcome::Unmatched).await.unwrap();

    assert_eq!(record.status, TestStatus::Failed);
    assert_eq!(record.error_kind, Some(ErrorKind::InvalidState));
    assert!(record
        .error
        .as_deref()
        .unwrap()
        .contains("no matching definition"));
    assert_eq!(record.states.last(), Some(&ScenarioState::SessionReleased));

    let reported = world::reporter()
        .records()
        .into_iter()
        .find(|r| r.name == "Cart total in an unknown unit")
        .unwrap();
    assert_eq!(reported.status, TestStatus::Failed);
    assert!(!world::reporter().all_passed());
}

#[tokio::test]
async fn test_panicked_step_aborts() {
    let mut world = StoreWorld::new();
    world.start("Step panics").await;
    let record = world.conclude(StepOutcome::Failed).await.unwrap();
    assert_eq!(record.status, TestStatus::Aborted);
}

#[tokio::test]
async fn test_clean_scenario_passes() {
    let mut world = StoreWorld::new();
    world.start("Every step ran").await;
    let record = world.conclude(StepOutcome::Passed).await.unwrap();
    assert_eq!(record.status, TestStatus::Passed);
    assert!(world.conclude(StepOutcome::Passed).await.is_none());
}
