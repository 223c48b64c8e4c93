//! Given/When/Then step sequencing.
//!
//! A [`Sequencer`] runs the steps of one scenario strictly in order, logs
//! each one, and journals `{keyword, description, status, duration}`. The
//! first failure stops the scenario: later step calls are journaled as
//! skipped and return an error without polling their future.
//!
//! ```ignore
//! let home = HomeScreen::new(session.clone());
//! seq.given("the home page is open", home.open()).await?;
//! let details = seq.when("Samsung galaxy s6 is selected", home.click_product("Samsung galaxy s6")).await?;
//! seq.then("the price includes tax", details.verify_product_details("Samsung galaxy s6", "$360 *includes tax")).await?;
//! ```

use crate::dialog::{AlertExpectation, Dialog};
use crate::result::{CheckError, CheckResult};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{error, info};

/// Gherkin step keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Precondition
    Given,
    /// Action
    When,
    /// Outcome
    Then,
    /// Continues the previous keyword
    And,
    /// Continues the previous keyword, negated in prose
    But,
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Given => "GIVEN",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::And => "AND",
            Self::But => "BUT",
        };
        f.write_str(s)
    }
}

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Completed
    Passed,
    /// Returned an error
    Failed,
    /// Not run because an earlier step failed
    Skipped,
}

/// Journal entry for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Keyword
    pub keyword: Keyword,
    /// Step text
    pub description: String,
    /// Outcome
    pub status: StepStatus,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Error message for failed steps
    pub error: Option<String>,
}

/// Shared, append-only step log
#[derive(Debug, Clone, Default)]
pub struct StepJournal {
    entries: Arc<Mutex<Vec<StepRecord>>>,
}

impl StepJournal {
    /// Empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, record: StepRecord) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(record);
        }
    }

    /// Copy of every entry so far
    #[must_use]
    pub fn records(&self) -> Vec<StepRecord> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether nothing was journaled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs the steps of one scenario
#[derive(Debug)]
pub struct Sequencer {
    scenario: String,
    journal: StepJournal,
    started: bool,
    failed: bool,
}

impl Sequencer {
    /// Sequencer with its own journal
    #[must_use]
    pub fn new(scenario: impl Into<String>) -> Self {
        Self::with_journal(scenario, StepJournal::new())
    }

    /// Sequencer writing into `journal`
    #[must_use]
    pub fn with_journal(scenario: impl Into<String>, journal: StepJournal) -> Self {
        Self {
            scenario: scenario.into(),
            journal,
            started: false,
            failed: false,
        }
    }

    /// Scenario name
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// The journal
    #[must_use]
    pub const fn journal(&self) -> &StepJournal {
        &self.journal
    }

    /// Whether a step has failed
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.failed
    }

    /// Run a `Given` step
    pub async fn given<T, F>(&mut self, description: impl Into<String>, step: F) -> CheckResult<T>
    where
        F: Future<Output = CheckResult<T>>,
    {
        self.step(Keyword::Given, description, step).await
    }

    /// Run a `When` step
    pub async fn when<T, F>(&mut self, description: impl Into<String>, step: F) -> CheckResult<T>
    where
        F: Future<Output = CheckResult<T>>,
    {
        self.step(Keyword::When, description, step).await
    }

    /// Run a `Then` step
    pub async fn then<T, F>(&mut self, description: impl Into<String>, step: F) -> CheckResult<T>
    where
        F: Future<Output = CheckResult<T>>,
    {
        self.step(Keyword::Then, description, step).await
    }

    /// Run an `And` step
    pub async fn and<T, F>(&mut self, description: impl Into<String>, step: F) -> CheckResult<T>
    where
        F: Future<Output = CheckResult<T>>,
    {
        self.step(Keyword::And, description, step).await
    }

    /// Expect-and-dismiss: wait for the dialog, accept it, then compare
    pub async fn then_alert(
        &mut self,
        session: &Session,
        expectation: AlertExpectation,
    ) -> CheckResult<Dialog> {
        let description = format!("the alert '{}' is shown and accepted", expectation.expected());
        self.step(Keyword::Then, description, session.expect_alert(expectation))
            .await
    }

    /// Run one step under `keyword`
    pub async fn step<T, F>(
        &mut self,
        keyword: Keyword,
        description: impl Into<String>,
        step: F,
    ) -> CheckResult<T>
    where
        F: Future<Output = CheckResult<T>>,
    {
        let description = description.into();
        if self.failed {
            self.record(keyword, &description, StepStatus::Skipped, 0, None);
            return Err(CheckError::invalid_state(format!(
                "step '{description}' skipped: an earlier step failed"
            )));
        }
        if !self.started && keyword != Keyword::Given {
            self.failed = true;
            let message = format!("scenario must open with a Given step, got {keyword}");
            self.record(keyword, &description, StepStatus::Failed, 0, Some(message.clone()));
            return Err(CheckError::invalid_state(message));
        }
        self.started = true;

        info!(scenario = %self.scenario, "{keyword}: {description}");
        let start = Instant::now();
        let result = step.await;
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.record(keyword, &description, StepStatus::Passed, duration_ms, None),
            Err(e) => {
                self.failed = true;
                error!(scenario = %self.scenario, "{keyword} failed: {description}: {e}");
                self.record(
                    keyword,
                    &description,
                    StepStatus::Failed,
                    duration_ms,
                    Some(e.to_string()),
                );
            }
        }
        result
    }

    fn record(
        &self,
        keyword: Keyword,
        description: &str,
        status: StepStatus,
        duration_ms: u64,
        error: Option<String>,
    ) {
        self.journal.push(StepRecord {
            keyword,
            description: description.to_string(),
            status,
            duration_ms,
            error,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    mod ordering_tests {
        use super::*;

        #[tokio::test]
        async fn test_steps_journaled_in_order() {
            let mut seq = Sequencer::new("ordering");
            seq.given("a precondition", async { Ok(()) }).await.unwrap();
            let n = seq.when("an action", async { Ok(7) }).await.unwrap();
            assert_eq!(n, 7);
            seq.then("an outcome", async { Ok(()) }).await.unwrap();
            seq.and("another outcome", async { Ok(()) }).await.unwrap();

            let records = seq.journal().records();
            let keywords: Vec<_> = records.iter().map(|r| r.keyword).collect();
            assert_eq!(
                keywords,
                vec![Keyword::Given, Keyword::When, Keyword::Then, Keyword::And]
            );
            assert!(records.iter().all(|r| r.status == StepStatus::Passed));
        }

        #[tokio::test]
        async fn test_must_open_with_given() {
            let mut seq = Sequencer::new("no given");
            let err = seq.when("an action", async { Ok(()) }).await.unwrap_err();
            assert!(matches!(err, CheckError::InvalidState { .. }));
            assert!(seq.has_failed());
        }
    }

    mod fail_fast_tests {
        use super::*;

        #[tokio::test]
        async fn test_failure_skips_later_steps() {
            let mut seq = Sequencer::new("fail fast");
            seq.given("ok", async { Ok(()) }).await.unwrap();
            let err = seq
                .when("breaks", async {
                    Err::<(), _>(CheckError::assertion("cart", "missing row"))
                })
                .await
                .unwrap_err();
            assert!(matches!(err, CheckError::Assertion { .. }));

            let ran = AtomicBool::new(false);
            let skipped = seq
                .then("never runs", async {
                    ran.store(true, Ordering::SeqCst);
                    Ok(())
                })
                .await;
            assert!(skipped.is_err());
            assert!(!ran.load(Ordering::SeqCst));

            let statuses: Vec<_> = seq.journal().records().iter().map(|r| r.status).collect();
            assert_eq!(
                statuses,
                vec![StepStatus::Passed, StepStatus::Failed, StepStatus::Skipped]
            );
        }

        #[tokio::test]
        async fn test_failed_step_keeps_error_text() {
            let mut seq = Sequencer::new("error text");
            seq.given("ok", async { Ok(()) }).await.unwrap();
            let _ = seq
                .then("breaks", async {
                    Err::<(), _>(CheckError::alert_missing("Product added"))
                })
                .await;
            let failed = &seq.journal().records()[1];
            assert!(failed.error.as_deref().unwrap().contains("Product added"));
        }
    }

    mod journal_tests {
        use super::*;

        #[tokio::test]
        async fn test_shared_journal() {
            let journal = StepJournal::new();
            let mut seq = Sequencer::with_journal("shared", journal.clone());
            seq.given("ok", async { Ok(()) }).await.unwrap();
            assert_eq!(journal.len(), 1);
            assert!(!journal.is_empty());
        }

        #[test]
        fn test_keyword_display() {
            assert_eq!(Keyword::Given.to_string(), "GIVEN");
            assert_eq!(Keyword::But.to_string(), "BUT");
        }
    }
}
