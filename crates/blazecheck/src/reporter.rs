//! Scenario reporting.
//!
//! The harness pushes one [`ScenarioRecord`] per scenario into a
//! [`ReportSink`]. [`Reporter`] is the stock sink: it keeps every record,
//! renders a summary line, JSON and JUnit XML, and answers whether a
//! fail-fast run should stop.
//!
//! ```ignore
//! let reporter = Arc::new(Reporter::new().with_name("demoblaze"));
//! let harness = Harness::new(config).with_sink(reporter.clone());
//! // ... run scenarios ...
//! reporter.write_junit(Path::new("target/blazecheck.xml"))?;
//! ```

use crate::harness::ScenarioState;
use crate::result::{CheckResult, ErrorKind};
use crate::sequencer::StepRecord;
use serde::Serialize;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// What to do after a failed scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Keep running and collect every failure
    #[default]
    CollectAll,
    /// Stop scheduling scenarios after the first failure
    FailFast,
}

/// Verdict of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Every step passed and the session was released
    Passed,
    /// A step failed
    Failed,
    /// The session could not be acquired or released, or the body panicked
    Aborted,
    /// Not run
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Failed or aborted
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed | Self::Aborted)
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// A file captured for a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// Short label, e.g. `screenshot`
    pub name: String,
    /// MIME type
    pub mime: String,
    /// Where the file was written
    pub path: PathBuf,
}

impl Attachment {
    /// PNG screenshot
    #[must_use]
    pub fn screenshot(path: impl Into<PathBuf>) -> Self {
        Self {
            name: "screenshot".into(),
            mime: "image/png".into(),
            path: path.into(),
        }
    }

    /// HTML page source
    #[must_use]
    pub fn page_source(path: impl Into<PathBuf>) -> Self {
        Self {
            name: "page-source".into(),
            mime: "text/html".into(),
            path: path.into(),
        }
    }
}

/// Everything reported about one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRecord {
    /// Display name
    pub name: String,
    /// Verdict
    pub status: TestStatus,
    /// Wall time in milliseconds
    pub duration_ms: u64,
    /// Failure message
    pub error: Option<String>,
    /// Failure classification
    pub error_kind: Option<ErrorKind>,
    /// Journaled steps
    pub steps: Vec<StepRecord>,
    /// Lifecycle states visited
    pub states: Vec<ScenarioState>,
    /// Captured files
    pub attachments: Vec<Attachment>,
}

impl ScenarioRecord {
    /// Passing record
    #[must_use]
    pub fn passed(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration_ms,
            error: None,
            error_kind: None,
            steps: Vec::new(),
            states: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Failing record
    #[must_use]
    pub fn failed(name: impl Into<String>, duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Failed,
            error: Some(error.into()),
            ..Self::passed(name, duration_ms)
        }
    }

    /// Not run
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Skipped,
            ..Self::passed(name, 0)
        }
    }

    /// Attach a captured file
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Receives scenario events from the harness
pub trait ReportSink: Send + Sync + Debug {
    /// A scenario is about to acquire its session
    fn scenario_started(&self, name: &str);

    /// A scenario released its session
    fn scenario_finished(&self, record: &ScenarioRecord);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn scenario_started(&self, _name: &str) {}

    fn scenario_finished(&self, _record: &ScenarioRecord) {}
}

/// Collecting reporter
#[derive(Debug)]
pub struct Reporter {
    records: Mutex<Vec<ScenarioRecord>>,
    failure_mode: FailureMode,
    suite_name: String,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Reporter in collect-all mode
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            failure_mode: FailureMode::CollectAll,
            suite_name: "blazecheck".to_string(),
        }
    }

    /// Reporter in fail-fast mode
    #[must_use]
    pub fn fail_fast() -> Self {
        Self::new().with_failure_mode(FailureMode::FailFast)
    }

    /// Set suite name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Set failure mode
    #[must_use]
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Failure mode
    #[must_use]
    pub const fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    /// Suite name
    #[must_use]
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    /// Whether no further scenarios should start
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.failure_mode == FailureMode::FailFast && self.failed_count() > 0
    }

    /// Record a scenario directly
    pub fn record(&self, record: ScenarioRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    /// Copy of every record
    #[must_use]
    pub fn records(&self) -> Vec<ScenarioRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn count(&self, pred: impl Fn(&ScenarioRecord) -> bool) -> usize {
        self.records
            .lock()
            .map(|r| r.iter().filter(|rec| pred(rec)).count())
            .unwrap_or(0)
    }

    /// Get number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(|r| r.status.is_passed())
    }

    /// Failed plus aborted
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|r| r.status.is_failed())
    }

    /// Aborted only
    #[must_use]
    pub fn aborted_count(&self) -> usize {
        self.count(|r| r.status == TestStatus::Aborted)
    }

    /// Skipped only
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|r| r.status == TestStatus::Skipped)
    }

    /// Get total scenario count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.count(|_| true)
    }

    /// Get pass rate (0.0 to 1.0)
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 1.0;
        }
        self.passed_count() as f64 / total as f64
    }

    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Sum of scenario durations
    #[must_use]
    pub fn total_duration_ms(&self) -> u64 {
        self.records
            .lock()
            .map(|r| r.iter().map(|rec| rec.duration_ms).sum())
            .unwrap_or(0)
    }

    /// Failed and aborted records
    #[must_use]
    pub fn failures(&self) -> Vec<ScenarioRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%), {} failed, {} aborted, {} skipped",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0,
            self.failed_count() - self.aborted_count(),
            self.aborted_count(),
            self.skipped_count(),
        )
    }

    /// Render the records as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn render_json(&self) -> CheckResult<String> {
        #[derive(Serialize)]
        struct Report<'a> {
            suite: &'a str,
            passed: usize,
            failed: usize,
            total: usize,
            duration_ms: u64,
            scenarios: Vec<ScenarioRecord>,
        }

        let report = Report {
            suite: &self.suite_name,
            passed: self.passed_count(),
            failed: self.failed_count(),
            total: self.total_count(),
            duration_ms: self.total_duration_ms(),
            scenarios: self.records(),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Write the JSON report
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn write_json(&self, output_path: &Path) -> CheckResult<()> {
        let json = self.render_json()?;
        std::fs::write(output_path, json)?;
        Ok(())
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let records = self.records();
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="{}" tests="{}" failures="{}" errors="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.suite_name),
            records.len(),
            self.failed_count() - self.aborted_count(),
            self.aborted_count(),
            self.skipped_count(),
            self.total_duration_ms() as f64 / 1000.0
        ));
        xml.push('\n');

        for record in &records {
            xml.push_str(&format!(
                r#"  <testcase name="{}" time="{:.3}">"#,
                escape_xml(&record.name),
                record.duration_ms as f64 / 1000.0
            ));
            xml.push('\n');

            let message = record.error.as_deref().unwrap_or_default();
            let kind = record
                .error_kind
                .map(|k| k.to_string())
                .unwrap_or_default();
            match record.status {
                TestStatus::Failed => xml.push_str(&format!(
                    "    <failure message=\"{}\" type=\"{}\">{}</failure>\n",
                    escape_xml(message),
                    kind,
                    escape_xml(message)
                )),
                TestStatus::Aborted => xml.push_str(&format!(
                    "    <error message=\"{}\" type=\"{}\">{}</error>\n",
                    escape_xml(message),
                    kind,
                    escape_xml(message)
                )),
                TestStatus::Skipped => xml.push_str("    <skipped/>\n"),
                TestStatus::Passed => {}
            }

            if !record.attachments.is_empty() {
                xml.push_str("    <system-out>");
                for attachment in &record.attachments {
                    xml.push_str(&format!(
                        "[[ATTACHMENT|{}]]\n",
                        escape_xml(&attachment.path.display().to_string())
                    ));
                }
                xml.push_str("</system-out>\n");
            }

            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Generate JUnit XML for CI integration
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn write_junit(&self, output_path: &Path) -> CheckResult<()> {
        std::fs::write(output_path, self.render_junit())?;
        Ok(())
    }
}

impl ReportSink for Reporter {
    fn scenario_started(&self, _name: &str) {}

    fn scenario_finished(&self, record: &ScenarioRecord) {
        self.record(record.clone());
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
