//! Per-scenario world: one harness scenario, one sequencer, one current screen.

use blazecheck::prelude::*;
use cucumber::event::ScenarioFinished;
use cucumber::World;
use std::sync::{Arc, OnceLock};

/// Reporter shared by every scenario of the run
pub fn reporter() -> Arc<Reporter> {
    static REPORTER: OnceLock<Arc<Reporter>> = OnceLock::new();
    REPORTER
        .get_or_init(|| Arc::new(Reporter::new().with_name("bdd")))
        .clone()
}

/// How cucumber saw the scenario end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Every step ran
    Passed,
    /// A step or the before hook panicked
    Failed,
    /// A step had no matching definition
    Unmatched,
}

impl StepOutcome {
    pub fn from_event(event: &ScenarioFinished) -> Self {
        match event {
            ScenarioFinished::StepPassed => Self::Passed,
            ScenarioFinished::StepSkipped => Self::Unmatched,
            ScenarioFinished::StepFailed(..) | ScenarioFinished::BeforeHookFailed(..) => {
                Self::Failed
            }
        }
    }
}

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct StoreWorld {
    harness: Harness,
    scenario: Option<ActiveScenario>,
    pub seq: Sequencer,
    pub screen: ActiveScreen,
    pub order_details: Option<OrderDetails>,
    failure: Option<CheckError>,
}

impl StoreWorld {
    pub fn new() -> Self {
        let config = HarnessConfig::simulated().with_capture_artifacts(false);
        let harness = Harness::with_factory(config, Arc::new(SimulatedFactory::new()))
            .with_sink(reporter());
        Self {
            harness,
            scenario: None,
            seq: Sequencer::new("unstarted"),
            screen: ActiveScreen::None,
            order_details: None,
            failure: None,
        }
    }

    /// Acquire the scenario's session
    pub async fn start(&mut self, name: &str) {
        match self.harness.begin(name).await {
            Ok(active) => {
                self.seq = active.sequencer();
                self.scenario = Some(active);
            }
            Err(e) => panic!("session acquisition failed: {e}"),
        }
    }

    /// Finish the scenario: capture on failure, then release
    pub async fn conclude(&mut self, outcome: StepOutcome) -> Option<ScenarioRecord> {
        let active = self.scenario.take()?;
        self.screen = ActiveScreen::None;
        let record = match (self.failure.take(), outcome) {
            (Some(e), _) => active.finish(Err(e)).await,
            (None, StepOutcome::Failed) => active.abort("step panicked").await,
            (None, StepOutcome::Unmatched) => {
                active
                    .finish(Err(CheckError::invalid_state(
                        "a step has no matching definition",
                    )))
                    .await
            }
            (None, StepOutcome::Passed) => active.finish(Ok(())).await,
        };
        tracing::debug!(scenario = %record.name, status = %record.status, "concluded");
        Some(record)
    }

    pub fn session(&self) -> Session {
        match &self.scenario {
            Some(active) => active.session().clone(),
            None => panic!("no active scenario"),
        }
    }

    /// Unwrap a step result, keeping the error for the verdict
    pub fn check<T>(&mut self, result: CheckResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                let message = e.to_string();
                self.failure = Some(e);
                panic!("{message}");
            }
        }
    }

    pub fn home(&self) -> HomeScreen {
        match &self.screen {
            ActiveScreen::Home(s) => s.clone(),
            other => panic!("expected home screen, on {}", other.name()),
        }
    }

    pub fn product(&self) -> ProductDetailsScreen {
        match &self.screen {
            ActiveScreen::Product(s) => s.clone(),
            other => panic!("expected product details, on {}", other.name()),
        }
    }

    pub fn cart(&self) -> CartScreen {
        match &self.screen {
            ActiveScreen::Cart(s) => s.clone(),
            other => panic!("expected cart, on {}", other.name()),
        }
    }

    pub fn order(&self) -> OrderModal {
        match &self.screen {
            ActiveScreen::Order(s) => s.clone(),
            other => panic!("expected order form, on {}", other.name()),
        }
    }

    pub fn contact(&self) -> ContactModal {
        match &self.screen {
            ActiveScreen::Contact(s) => s.clone(),
            other => panic!("expected contact modal, on {}", other.name()),
        }
    }
}
