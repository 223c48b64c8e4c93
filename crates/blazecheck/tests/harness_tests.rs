//! Scenario lifecycle: verdicts, capture, release and isolation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use blazecheck::prelude::*;
use blazecheck::suite;
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    harness: Harness,
    factory: SimulatedFactory,
    reporter: Arc<Reporter>,
    artifacts: TempDir,
}

fn fixture(factory: SimulatedFactory) -> Fixture {
    let artifacts = tempfile::tempdir().unwrap();
    let reporter = Arc::new(Reporter::new());
    let config = HarnessConfig::simulated().with_artifacts_dir(artifacts.path());
    let harness = Harness::with_factory(config, Arc::new(factory.clone()))
        .with_sink(reporter.clone());
    Fixture {
        harness,
        factory,
        reporter,
        artifacts,
    }
}

fn faulty(fault: Fault) -> SimulatedFactory {
    SimulatedFactory::with_builder(SimulatedStorefront::builder().fault(fault))
}

async fn open_home(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    Ok(())
}

mod verdict_tests {
    use super::*;
    use ScenarioState::*;

    #[tokio::test]
    async fn test_passed_scenario_releases_session() {
        let fx = fixture(SimulatedFactory::new());
        let record = fx.harness.run("open home", open_home).await;

        assert_eq!(record.status, TestStatus::Passed);
        assert_eq!(record.states, vec![NotStarted, SessionActive, Passed, SessionReleased]);
        assert!(record.attachments.is_empty());
        assert!(fx.factory.storefronts()[0].is_closed());
    }

    #[tokio::test]
    async fn test_failed_scenario_captures_then_releases() {
        let fx = fixture(faulty(Fault::UnreachableHost));
        let record = fx.harness.run("unreachable", open_home).await;

        assert_eq!(record.status, TestStatus::Failed);
        assert_eq!(record.error_kind, Some(ErrorKind::Navigation));
        assert_eq!(record.states, vec![NotStarted, SessionActive, Failed, SessionReleased]);
        assert_eq!(record.attachments.len(), 2);
        for attachment in &record.attachments {
            assert!(attachment.path.starts_with(fx.artifacts.path()));
            assert!(attachment.path.exists(), "{}", attachment.path.display());
        }

        let calls = fx.factory.storefronts()[0].calls();
        let shot = calls.iter().position(|c| c == "screenshot").unwrap();
        let close = calls.iter().position(|c| c == "close").unwrap();
        assert!(shot < close, "capture must precede release: {calls:?}");
    }

    #[tokio::test]
    async fn test_capture_disabled() {
        let artifacts = tempfile::tempdir().unwrap();
        let config = HarnessConfig::simulated()
            .with_artifacts_dir(artifacts.path())
            .with_capture_artifacts(false);
        let factory = faulty(Fault::UnreachableHost);
        let harness = Harness::with_factory(config, Arc::new(factory.clone()));
        let record = harness.run("unreachable", open_home).await;

        assert_eq!(record.status, TestStatus::Failed);
        assert!(record.attachments.is_empty());
        assert!(!factory.storefronts()[0].was_called("screenshot"));
    }

    #[tokio::test]
    async fn test_capture_failure_keeps_verdict() {
        let factory = SimulatedFactory::with_builder(
            SimulatedStorefront::builder()
                .fault(Fault::UnreachableHost)
                .fault(Fault::ScreenshotFails),
        );
        let fx = fixture(factory);
        let record = fx.harness.run("unreachable", open_home).await;

        assert_eq!(record.status, TestStatus::Failed);
        assert_eq!(record.error_kind, Some(ErrorKind::Navigation));
        assert_eq!(record.attachments.len(), 1);
        assert_eq!(record.attachments[0].mime, "text/html");
    }

    #[tokio::test]
    async fn test_panic_aborts_and_releases() {
        let fx = fixture(SimulatedFactory::new());
        let record = fx
            .harness
            .run("panics", |session, mut seq| async move {
                let home = HomeScreen::new(session);
                seq.given("I am on the home page", home.open()).await?;
                if seq.journal().len() == 1 {
                    panic!("step helper blew up");
                }
                Ok::<(), CheckError>(())
            })
            .await;

        assert_eq!(record.status, TestStatus::Aborted);
        assert!(record.error.as_deref().unwrap().contains("step helper blew up"));
        assert_eq!(record.states.last(), Some(&SessionReleased));
        assert!(fx.factory.storefronts()[0].is_closed());
    }

    #[tokio::test]
    async fn test_session_error_aborts() {
        let fx = fixture(SimulatedFactory::new());
        let record = fx
            .harness
            .run("lost browser", |_session, _seq| async {
                Err::<(), _>(CheckError::session("browser disconnected"))
            })
            .await;

        assert_eq!(record.status, TestStatus::Aborted);
        assert_eq!(record.error_kind, Some(ErrorKind::Session));
    }

    #[tokio::test]
    async fn test_acquisition_failure() {
        let fx = fixture(SimulatedFactory::failing());
        let mut ran = false;
        let record = fx
            .harness
            .run("no browser", |_session, _seq| {
                ran = true;
                async { Ok::<(), CheckError>(()) }
            })
            .await;

        assert!(!ran);
        assert_eq!(record.status, TestStatus::Aborted);
        assert_eq!(record.states, vec![NotStarted, Aborted, SessionReleased]);
        assert_eq!(fx.reporter.aborted_count(), 1);
    }

    #[tokio::test]
    async fn test_release_failure_downgrades_pass() {
        let fx = fixture(faulty(Fault::CloseFails));
        let record = fx.harness.run("close fails", open_home).await;

        assert_eq!(record.status, TestStatus::Aborted);
        assert_eq!(record.error_kind, Some(ErrorKind::Session));
        assert_eq!(record.states, vec![NotStarted, SessionActive, Passed, SessionReleased]);
    }
}

mod alert_tests {
    use super::*;

    #[tokio::test]
    async fn test_unconsumed_alert_fails_next_action_and_is_cleared_for_capture() {
        let fx = fixture(SimulatedFactory::new());
        let record = fx
            .harness
            .run("forgot alert", |session, mut seq| async move {
                let home = HomeScreen::new(session);
                seq.given("I am on the home page", home.open()).await?;
                let details = seq
                    .when("I open Samsung galaxy s6", home.click_product("Samsung galaxy s6"))
                    .await?;
                seq.and("I add it to the cart", details.click_add_to_cart())
                    .await?;
                seq.and(
                    "I wait for the dialog",
                    Waiter::new(WaitOptions::new().with_timeout(1000))
                        .until(|| details.session().open_dialog()),
                )
                .await?;
                seq.and("I go to the cart", details.click_cart_link())
                    .await?;
                Ok::<(), CheckError>(())
            })
            .await;

        assert_eq!(record.status, TestStatus::Failed);
        assert_eq!(record.error_kind, Some(ErrorKind::AlertExpectation));
        assert!(record.error.as_deref().unwrap().contains("Product added."));
        assert_eq!(record.attachments.len(), 2);
    }

    #[tokio::test]
    async fn test_alert_text_mismatch_reported() {
        let fx = fixture(faulty(Fault::AddedAlertText("Out of stock".into())));
        let case = suite::find("cart.add_product").unwrap();
        let record = fx.harness.run_case(&case).await;

        assert_eq!(record.status, TestStatus::Failed);
        assert_eq!(record.error_kind, Some(ErrorKind::AlertExpectation));
        let message = record.error.unwrap();
        assert!(message.contains("Product added"));
        assert!(message.contains("Out of stock"));
        let failed = record.steps.last().unwrap();
        assert_eq!(failed.status, StepStatus::Failed);
        assert_eq!(failed.keyword, Keyword::Then);
    }

    #[tokio::test]
    async fn test_missing_alert_reported() {
        let fx = fixture(faulty(Fault::SuppressAlerts));
        let case = suite::find("contact.send_empty").unwrap();
        let record = fx.harness.run_case(&case).await;

        assert_eq!(record.status, TestStatus::Failed);
        assert_eq!(record.error_kind, Some(ErrorKind::AlertExpectation));
    }
}

mod isolation_tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_scenario_leaves_no_state_behind() {
        let fx = fixture(SimulatedFactory::new());

        let first = fx
            .harness
            .run("fills cart then fails", |session, mut seq| async move {
                let home = HomeScreen::new(session.clone());
                seq.given("I am on the home page", home.open()).await?;
                let details = seq
                    .when("I open Nexus 6", home.click_product("Nexus 6"))
                    .await?;
                seq.and("I add it to the cart", details.click_add_to_cart())
                    .await?;
                seq.then_alert(&session, AlertExpectation::containing("Product added"))
                    .await?;
                seq.then(
                    "a product that is not there",
                    details.verify_product_details("Nexus 6", "$1 *includes tax"),
                )
                .await?;
                Ok::<(), CheckError>(())
            })
            .await;
        assert_eq!(first.status, TestStatus::Failed);
        assert_eq!(first.error_kind, Some(ErrorKind::Assertion));

        let case = suite::find("cart.empty").unwrap();
        let second = fx.harness.run_case(&case).await;
        assert_eq!(second.status, TestStatus::Passed, "{:?}", second.error);

        let storefronts = fx.factory.storefronts();
        assert_eq!(storefronts.len(), 2);
        assert_eq!(storefronts[0].cart(), vec!["Nexus 6"]);
        assert!(storefronts[1].cart().is_empty());
    }
}

mod run_cases_tests {
    use super::*;

    #[tokio::test]
    async fn test_fail_fast_skips_remaining() {
        let fx = fixture(faulty(Fault::UnreachableHost));
        let harness = fx.harness.clone().with_failure_mode(FailureMode::FailFast);
        let cases = CaseFilter::new().suite(Suite::Home).apply(suite::all());
        let records = harness.run_cases(&cases, 1).await;

        assert_eq!(records[0].status, TestStatus::Failed);
        assert!(records[1..].iter().all(|r| r.status == TestStatus::Skipped));
        assert_eq!(fx.reporter.skipped_count(), cases.len() - 1);
    }

    #[tokio::test]
    async fn test_collect_all_runs_everything() {
        let fx = fixture(faulty(Fault::UnreachableHost));
        let cases = CaseFilter::new().suite(Suite::Contact).apply(suite::all());
        let records = fx.harness.run_cases(&cases, 2).await;

        assert!(records.iter().all(|r| r.status == TestStatus::Failed));
        assert_eq!(fx.reporter.failed_count(), cases.len());
    }
}
