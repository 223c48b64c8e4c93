//! Scenario lifecycle.
//!
//! Every scenario gets a fresh [`Session`] from a [`SessionFactory`], runs
//! its body through a [`Sequencer`], and always releases the session
//! afterwards, whether the body returned, failed or panicked. Failed and
//! aborted scenarios get a screenshot and page source written to the
//! artifacts folder before release.
//!
//! ```text
//! NotStarted ──► SessionActive ──► Passed ──┐
//!      │                      ├──► Failed ──┼──► SessionReleased
//!      │                      └──► Aborted ─┤
//!      └──────────────────────────► Aborted ┘   (acquisition failed)
//! ```

use crate::config::{BrowserKind, HarnessConfig};
use crate::driver::Driver;
use crate::reporter::{
    Attachment, FailureMode, NullSink, ReportSink, ScenarioRecord, TestStatus,
};
use crate::result::{CheckError, CheckResult};
use crate::sequencer::{Sequencer, StepJournal};
use crate::session::Session;
use crate::simulated::{SimulatedStorefront, SimulatedStorefrontBuilder};
use crate::suite::ScenarioCase;
use async_trait::async_trait;
use futures::{FutureExt, StreamExt};
use serde::Serialize;
use std::fmt::Debug;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Lifecycle state of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    /// Nothing acquired yet
    NotStarted,
    /// Session acquired, body running
    SessionActive,
    /// Body completed
    Passed,
    /// Body returned an error
    Failed,
    /// Session trouble or panic
    Aborted,
    /// Session released; terminal
    SessionReleased,
}

impl ScenarioState {
    /// Whether `next` may follow `self`
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::SessionActive | Self::Aborted)
                | (Self::SessionActive, Self::Passed | Self::Failed | Self::Aborted)
                | (Self::Passed | Self::Failed | Self::Aborted, Self::SessionReleased)
        )
    }

    /// Whether no transition leaves this state
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::SessionReleased)
    }
}

impl std::fmt::Display for ScenarioState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not-started",
            Self::SessionActive => "session-active",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
            Self::SessionReleased => "session-released",
        };
        f.write_str(s)
    }
}

/// Ordered record of the states a scenario went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    history: Vec<ScenarioState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Starts in [`ScenarioState::NotStarted`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: vec![ScenarioState::NotStarted],
        }
    }

    /// Current state
    #[must_use]
    pub fn current(&self) -> ScenarioState {
        self.history
            .last()
            .copied()
            .unwrap_or(ScenarioState::NotStarted)
    }

    /// Move to `next`
    ///
    /// # Errors
    ///
    /// `InvalidState` if the transition is not allowed
    pub fn advance(&mut self, next: ScenarioState) -> CheckResult<()> {
        let current = self.current();
        if !current.can_transition_to(next) {
            return Err(CheckError::invalid_state(format!(
                "scenario cannot go from {current} to {next}"
            )));
        }
        self.history.push(next);
        Ok(())
    }

    /// Every state visited, oldest first
    #[must_use]
    pub fn history(&self) -> &[ScenarioState] {
        &self.history
    }
}

// =============================================================================
// SESSION FACTORIES
// =============================================================================

/// Opens one browser session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync + Debug {
    /// Acquire a fresh session configured by `config`
    async fn acquire(&self, config: &HarnessConfig) -> CheckResult<Session>;
}

/// Hands out [`SimulatedStorefront`] sessions
#[derive(Debug, Clone, Default)]
pub struct SimulatedFactory {
    builder: SimulatedStorefrontBuilder,
    fail_acquire: bool,
    opened: Arc<Mutex<Vec<Arc<SimulatedStorefront>>>>,
}

impl SimulatedFactory {
    /// Factory with default latency and no faults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build each storefront from `builder`
    #[must_use]
    pub fn with_builder(builder: SimulatedStorefrontBuilder) -> Self {
        Self {
            builder,
            ..Self::default()
        }
    }

    /// Factory whose acquisitions always fail
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_acquire: true,
            ..Self::default()
        }
    }

    /// Every storefront handed out so far
    #[must_use]
    pub fn storefronts(&self) -> Vec<Arc<SimulatedStorefront>> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SessionFactory for SimulatedFactory {
    async fn acquire(&self, config: &HarnessConfig) -> CheckResult<Session> {
        if self.fail_acquire {
            return Err(CheckError::session("simulated browser failed to start"));
        }
        let storefront = Arc::new(self.builder.clone().build());
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(Arc::clone(&storefront));
        }
        let driver: Arc<dyn Driver> = storefront;
        Ok(Session::new(driver, config.clone()))
    }
}

/// Launches a Chromium instance per scenario
#[cfg(feature = "browser")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeFactory;

#[cfg(feature = "browser")]
#[async_trait]
impl SessionFactory for ChromeFactory {
    async fn acquire(&self, config: &HarnessConfig) -> CheckResult<Session> {
        let driver = crate::browser::ChromiumDriver::launch(config)
            .await
            .map_err(|e| match e {
                CheckError::Session { .. } => e,
                other => CheckError::session(format!("browser launch failed: {other}")),
            })?;
        Ok(Session::new(Arc::new(driver), config.clone()))
    }
}

/// Factory matching `config.browser`
///
/// # Errors
///
/// `Config` when Chrome is requested but the `browser` feature is off
pub fn factory_for(config: &HarnessConfig) -> CheckResult<Arc<dyn SessionFactory>> {
    match config.browser {
        BrowserKind::Simulated => Ok(Arc::new(SimulatedFactory::new())),
        #[cfg(feature = "browser")]
        BrowserKind::Chrome => Ok(Arc::new(ChromeFactory)),
        #[cfg(not(feature = "browser"))]
        BrowserKind::Chrome => Err(CheckError::config(
            "browser 'chrome' needs blazecheck built with the `browser` feature",
        )),
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// Runs scenarios with per-scenario sessions
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
    factory: Arc<dyn SessionFactory>,
    sink: Arc<dyn ReportSink>,
    failure_mode: FailureMode,
    tripped: Arc<AtomicBool>,
}

impl Harness {
    /// Harness with the factory matching `config.browser`
    ///
    /// # Errors
    ///
    /// See [`factory_for`]
    pub fn new(config: HarnessConfig) -> CheckResult<Self> {
        let factory = factory_for(&config)?;
        Ok(Self::with_factory(config, factory))
    }

    /// Harness over an explicit factory
    #[must_use]
    pub fn with_factory(config: HarnessConfig, factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            config,
            factory,
            sink: Arc::new(NullSink),
            failure_mode: FailureMode::CollectAll,
            tripped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Report into `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Set failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Configuration handed to every session
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Whether fail-fast mode has seen a failure
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.failure_mode == FailureMode::FailFast && self.tripped.load(Ordering::SeqCst)
    }

    fn publish(&self, record: &ScenarioRecord) {
        if record.status.is_failed() {
            self.tripped.store(true, Ordering::SeqCst);
        }
        self.sink.scenario_finished(record);
    }

    async fn start(&self, name: &str) -> Result<ActiveScenario, Box<ScenarioRecord>> {
        info!("Scenario started: {name}");
        self.sink.scenario_started(name);
        let started = Instant::now();
        let mut lifecycle = Lifecycle::new();

        match self.factory.acquire(&self.config).await {
            Ok(session) => {
                transition(&mut lifecycle, ScenarioState::SessionActive);
                Ok(ActiveScenario {
                    name: name.to_string(),
                    session,
                    lifecycle,
                    journal: StepJournal::new(),
                    started,
                    harness: self.clone(),
                })
            }
            Err(e) => {
                error!("Test failed: {name}: {e}");
                transition(&mut lifecycle, ScenarioState::Aborted);
                transition(&mut lifecycle, ScenarioState::SessionReleased);
                let record = ScenarioRecord {
                    status: TestStatus::Aborted,
                    error: Some(e.to_string()),
                    error_kind: Some(e.kind()),
                    states: lifecycle.history().to_vec(),
                    ..ScenarioRecord::passed(name, elapsed_ms(started))
                };
                self.publish(&record);
                Err(Box::new(record))
            }
        }
    }

    /// Acquire a session for `name`; pair with [`ActiveScenario::finish`].
    ///
    /// # Errors
    ///
    /// `Session` when acquisition fails; the aborted scenario is already
    /// reported
    pub async fn begin(&self, name: &str) -> CheckResult<ActiveScenario> {
        self.start(name)
            .await
            .map_err(|record| CheckError::session(record.error.unwrap_or_default()))
    }

    /// Run one scenario body and report it
    pub async fn run<F, Fut>(&self, name: &str, body: F) -> ScenarioRecord
    where
        F: FnOnce(Session, Sequencer) -> Fut,
        Fut: Future<Output = CheckResult<()>>,
    {
        let active = match self.start(name).await {
            Ok(active) => active,
            Err(record) => return *record,
        };
        let outcome = AssertUnwindSafe(body(active.session.clone(), active.sequencer()))
            .catch_unwind()
            .await;
        match outcome {
            Ok(result) => active.finish(result).await,
            Err(payload) => active.abort(panic_message(payload.as_ref())).await,
        }
    }

    /// Run one catalog case
    pub async fn run_case(&self, case: &ScenarioCase) -> ScenarioRecord {
        self.run(case.name, case.run).await
    }

    /// Run `cases` with up to `jobs` concurrent sessions.
    ///
    /// Records come back in case order. In fail-fast mode cases not yet
    /// started when a failure lands are reported as skipped.
    pub async fn run_cases(&self, cases: &[ScenarioCase], jobs: usize) -> Vec<ScenarioRecord> {
        futures::stream::iter(cases)
            .map(|case| async move {
                if self.should_stop() {
                    let record = ScenarioRecord::skipped(case.name);
                    self.sink.scenario_finished(&record);
                    record
                } else {
                    self.run_case(case).await
                }
            })
            .buffered(jobs.max(1))
            .collect()
            .await
    }
}

/// A scenario holding a live session
#[derive(Debug)]
pub struct ActiveScenario {
    name: String,
    session: Session,
    lifecycle: Lifecycle,
    journal: StepJournal,
    started: Instant,
    harness: Harness,
}

impl ActiveScenario {
    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scenario's session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> ScenarioState {
        self.lifecycle.current()
    }

    /// Sequencer journaling into this scenario's record
    #[must_use]
    pub fn sequencer(&self) -> Sequencer {
        Sequencer::with_journal(self.name.clone(), self.journal.clone())
    }

    /// Conclude with the body's result
    pub async fn finish(self, result: CheckResult<()>) -> ScenarioRecord {
        match result {
            Ok(()) => self.conclude(TestStatus::Passed, None).await,
            Err(e) => {
                let status = if e.is_session() {
                    TestStatus::Aborted
                } else {
                    TestStatus::Failed
                };
                self.conclude(status, Some((e.to_string(), Some(e.kind()))))
                    .await
            }
        }
    }

    /// Conclude after a panic or hook failure
    pub async fn abort(self, reason: impl Into<String>) -> ScenarioRecord {
        self.conclude(TestStatus::Aborted, Some((reason.into(), None)))
            .await
    }

    async fn conclude(
        mut self,
        mut status: TestStatus,
        failure: Option<(String, Option<crate::result::ErrorKind>)>,
    ) -> ScenarioRecord {
        transition(&mut self.lifecycle, verdict_state(status));
        let (mut error, mut error_kind) = failure.map_or((None, None), |(m, k)| (Some(m), k));

        let mut attachments = Vec::new();
        if let Some(message) = &error {
            error!("Test failed: {}: {message}", self.name);
            if self.harness.config.capture_artifacts {
                attachments =
                    capture_artifacts(&self.session, &self.harness.config.artifacts_dir, &self.name)
                        .await;
            }
        }

        if let Err(e) = self.session.release().await {
            warn!("Session release failed for {}: {e}", self.name);
            if status == TestStatus::Passed {
                status = TestStatus::Aborted;
                error = Some(e.to_string());
                error_kind = Some(e.kind());
            }
        }
        transition(&mut self.lifecycle, ScenarioState::SessionReleased);

        let record = ScenarioRecord {
            name: self.name.clone(),
            status,
            duration_ms: elapsed_ms(self.started),
            error,
            error_kind,
            steps: self.journal.records(),
            states: self.lifecycle.history().to_vec(),
            attachments,
        };
        info!("Scenario {}: {}", record.status, record.name);
        self.harness.publish(&record);
        record
    }
}

const fn verdict_state(status: TestStatus) -> ScenarioState {
    match status {
        TestStatus::Passed => ScenarioState::Passed,
        TestStatus::Failed | TestStatus::Skipped => ScenarioState::Failed,
        TestStatus::Aborted => ScenarioState::Aborted,
    }
}

fn transition(lifecycle: &mut Lifecycle, next: ScenarioState) {
    if let Err(e) = lifecycle.advance(next) {
        warn!("{e}");
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("scenario panicked: {detail}")
}

// =============================================================================
// ARTIFACTS
// =============================================================================

/// File stem for a scenario's artifacts: `<slug>_<timestamp>_<id>`
#[must_use]
pub fn artifact_stem(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let id = Uuid::new_v4().simple().to_string();
    format!("{slug}_{stamp}_{}", &id[..8])
}

/// Write screenshot and page source; problems are logged, never raised
async fn capture_artifacts(session: &Session, dir: &Path, name: &str) -> Vec<Attachment> {
    match session.dismiss_open_dialog().await {
        Ok(Some(dialog)) => info!("Accepted dialog '{}' before capture", dialog.message()),
        Ok(None) => {}
        Err(e) => warn!("Could not clear dialog before capture: {e}"),
    }
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!("Cannot create artifacts folder {}: {e}", dir.display());
        return Vec::new();
    }

    let stem = artifact_stem(name);
    let mut attachments = Vec::new();

    match session.screenshot().await {
        Ok(shot) => {
            let path = dir.join(format!("{stem}.png"));
            match tokio::fs::write(&path, &shot.data).await {
                Ok(()) => {
                    info!(bytes = shot.size_bytes(), "Screenshot saved: {}", path.display());
                    attachments.push(Attachment::screenshot(path));
                }
                Err(e) => warn!("Failed to write screenshot: {e}"),
            }
        }
        Err(e) => warn!("Failed to capture screenshot: {e}"),
    }

    match session.page_source().await {
        Ok(html) => {
            let path = dir.join(format!("{stem}.html"));
            match tokio::fs::write(&path, html).await {
                Ok(()) => attachments.push(Attachment::page_source(path)),
                Err(e) => warn!("Failed to write page source: {e}"),
            }
        }
        Err(e) => warn!("Failed to capture page source: {e}"),
    }

    attachments
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod state_machine_tests {
        use super::*;
        use ScenarioState::*;

        #[test]
        fn test_happy_path() {
            let mut lc = Lifecycle::new();
            lc.advance(SessionActive).unwrap();
            lc.advance(Passed).unwrap();
            lc.advance(SessionReleased).unwrap();
            assert_eq!(lc.history(), &[NotStarted, SessionActive, Passed, SessionReleased]);
            assert!(lc.current().is_terminal());
        }

        #[test]
        fn test_acquisition_failure_path() {
            let mut lc = Lifecycle::new();
            lc.advance(Aborted).unwrap();
            lc.advance(SessionReleased).unwrap();
        }

        #[test]
        fn test_invalid_transitions_rejected() {
            let mut lc = Lifecycle::new();
            assert!(lc.advance(Passed).is_err());
            assert!(lc.advance(SessionReleased).is_err());
            lc.advance(SessionActive).unwrap();
            lc.advance(Failed).unwrap();
            assert!(matches!(
                lc.advance(Passed),
                Err(CheckError::InvalidState { .. })
            ));
            lc.advance(SessionReleased).unwrap();
            for next in [NotStarted, SessionActive, Passed, Failed, Aborted, SessionReleased] {
                assert!(!SessionReleased.can_transition_to(next));
            }
        }
    }

    mod factory_tests {
        use super::*;

        #[test]
        fn test_factory_for_simulated() {
            assert!(factory_for(&HarnessConfig::simulated()).is_ok());
        }

        #[cfg(not(feature = "browser"))]
        #[test]
        fn test_factory_for_chrome_needs_feature() {
            let err = factory_for(&HarnessConfig::default()).unwrap_err();
            assert!(matches!(err, CheckError::Config { .. }));
        }

        #[tokio::test]
        async fn test_simulated_factory_tracks_storefronts() {
            let factory = SimulatedFactory::new();
            let a = factory.acquire(&HarnessConfig::simulated()).await.unwrap();
            let b = factory.acquire(&HarnessConfig::simulated()).await.unwrap();
            assert_ne!(a.id(), b.id());
            assert_eq!(factory.storefronts().len(), 2);
        }
    }

    mod helper_tests {
        use super::*;

        #[test]
        fn test_artifact_stem() {
            let stem = artifact_stem("Add Samsung to cart!");
            assert!(stem.starts_with("add_samsung_to_cart__"));
            assert!(!stem.contains(' '));
        }

        #[test]
        fn test_panic_message() {
            let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
            assert_eq!(panic_message(payload.as_ref()), "scenario panicked: boom");
            let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
            assert_eq!(panic_message(payload.as_ref()), "scenario panicked: bang");
        }
    }
}
