//! Scenario runner: harness, progress and report file

use crate::config::{CliConfig, ReportKind};
use crate::error::{CliError, CliResult};
use crate::output::{ProgressReporter, ProgressSink};
use blazecheck::{
    FailureMode, Harness, HarnessConfig, Reporter, ScenarioCase, ScenarioRecord, SessionFactory,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Outcome of one `run`
#[derive(Debug)]
pub struct RunOutcome {
    /// Records in case order
    pub records: Vec<ScenarioRecord>,
    /// Collected results
    pub reporter: Arc<Reporter>,
}

impl RunOutcome {
    /// Failed plus aborted
    #[must_use]
    pub fn not_passed(&self) -> usize {
        self.reporter.failed_count() + self.reporter.aborted_count()
    }

    /// `Err(ScenariosFailed)` unless every scenario passed or was skipped
    pub fn into_result(self) -> CliResult<Self> {
        let failed = self.not_passed();
        if failed > 0 {
            return Err(CliError::ScenariosFailed {
                failed,
                total: self.reporter.total_count(),
            });
        }
        Ok(self)
    }
}

/// Runs selected cases through a [`Harness`]
#[derive(Debug)]
pub struct ScenarioRunner {
    config: CliConfig,
    progress: ProgressReporter,
}

impl ScenarioRunner {
    /// Create a new runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let progress =
            ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, progress }
    }

    /// Run `cases` with sessions from the factory matching `harness_config`
    pub async fn run(
        &mut self,
        harness_config: HarnessConfig,
        cases: &[ScenarioCase],
    ) -> CliResult<RunOutcome> {
        let factory = blazecheck::factory_for(&harness_config)?;
        self.run_with_factory(harness_config, factory, cases).await
    }

    /// Run `cases` with sessions from `factory`
    pub async fn run_with_factory(
        &mut self,
        harness_config: HarnessConfig,
        factory: Arc<dyn SessionFactory>,
        cases: &[ScenarioCase],
    ) -> CliResult<RunOutcome> {
        let mode = if self.config.fail_fast {
            FailureMode::FailFast
        } else {
            FailureMode::CollectAll
        };
        let reporter = Arc::new(
            Reporter::new()
                .with_name("blazecheck")
                .with_failure_mode(mode),
        );

        if cases.is_empty() {
            self.progress.warning("No scenarios match the filter");
            return Ok(RunOutcome {
                records: Vec::new(),
                reporter,
            });
        }

        let jobs = self.config.effective_jobs();
        self.progress.header(&format!(
            "Running {} scenarios on {} ({} lane{})",
            cases.len(),
            harness_config.browser,
            jobs,
            if jobs == 1 { "" } else { "s" }
        ));
        if self.config.verbosity.is_verbose() {
            self.progress.info(&format!("Store at {}", harness_config.base_url));
            if harness_config.capture_artifacts {
                self.progress.info(&format!(
                    "Failure artifacts go to {}",
                    harness_config.artifacts_dir.display()
                ));
            }
        }
        info!(
            scenarios = cases.len(),
            jobs,
            browser = %harness_config.browser,
            base_url = %harness_config.base_url,
            "starting run"
        );

        self.progress
            .start_progress(cases.len() as u64, "Starting...");
        let sink = Arc::new(ProgressSink::new(reporter.clone(), self.progress.clone()));
        let harness = Harness::with_factory(harness_config, factory)
            .with_sink(sink)
            .with_failure_mode(mode);

        let start = Instant::now();
        let records = harness.run_cases(cases, jobs).await;
        self.progress.finish();
        self.progress.summary(&reporter, start.elapsed());

        if let Some(path) = &self.config.report {
            match self.config.report_kind {
                ReportKind::Json => reporter.write_json(path),
                ReportKind::Junit => reporter.write_junit(path),
            }
            .map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
            self.progress
                .info(&format!("Report written to {}", path.display()));
        }

        Ok(RunOutcome { records, reporter })
    }
}
