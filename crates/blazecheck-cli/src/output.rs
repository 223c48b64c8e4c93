//! Terminal output and progress reporting

use blazecheck::{ReportSink, Reporter, ScenarioRecord, TestStatus};
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Progress reporter for scenario execution
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: &str) {
        match &self.progress_bar {
            Some(pb) if !pb.is_hidden() => pb.println(text),
            _ => {
                let _ = self.term.write_line(text);
            }
        }
    }

    fn tagged(&self, symbol: &str, plain: &str, color: Style, message: &str) {
        let prefix = if self.use_color {
            color.apply_to(symbol).bold().to_string()
        } else {
            plain.to_string()
        };
        self.line(&format!("{prefix} {message}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.tagged("✓", "PASS", Style::new().green(), message);
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures are printed in quiet mode too
        self.tagged("✗", "FAIL", Style::new().red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.tagged("⚠", "WARN", Style::new().yellow(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.tagged("ℹ", "INFO", Style::new().blue(), message);
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.line("");
        self.line(&styled);
    }

    /// One line per finished scenario
    pub fn scenario(&self, record: &ScenarioRecord) {
        let message = format!("{} ({}ms)", record.name, record.duration_ms);
        match record.status {
            TestStatus::Passed => self.success(&message),
            TestStatus::Skipped => {
                if !self.quiet {
                    self.tagged("-", "SKIP", Style::new().dim(), &record.name);
                }
            }
            TestStatus::Failed | TestStatus::Aborted => {
                let error = record.error.as_deref().unwrap_or("unknown error");
                self.failure(&format!("{message} [{}]: {error}", record.status));
                for attachment in &record.attachments {
                    self.info(&format!("  {}: {}", attachment.name, attachment.path.display()));
                }
            }
        }
    }

    /// Print the run summary
    pub fn summary(&self, reporter: &Reporter, duration: Duration) {
        let failed = reporter.failed_count() + reporter.aborted_count();
        if self.quiet && failed == 0 {
            return;
        }

        let passed = reporter.passed_count();
        let skipped = reporter.skipped_count();
        let total = reporter.total_count();
        let duration_secs = duration.as_secs_f64();

        self.line("");
        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            self.line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            self.line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped)"
            ));
        }
    }
}

/// Collects records and echoes progress as scenarios finish
#[derive(Debug)]
pub struct ProgressSink {
    reporter: Arc<Reporter>,
    progress: ProgressReporter,
}

impl ProgressSink {
    /// Forward to `reporter`, print through `progress`
    #[must_use]
    pub const fn new(reporter: Arc<Reporter>, progress: ProgressReporter) -> Self {
        Self { reporter, progress }
    }
}

impl ReportSink for ProgressSink {
    fn scenario_started(&self, name: &str) {
        self.reporter.scenario_started(name);
        self.progress.set_message(name);
    }

    fn scenario_finished(&self, record: &ScenarioRecord) {
        self.reporter.scenario_finished(record);
        self.progress.scenario(record);
        self.progress.increment(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use blazecheck::Attachment;

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_quiet_mode_has_no_bar() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(10, "Running scenarios");
            assert!(reporter.progress_bar.is_none());
            reporter.success("hidden");
            reporter.failure("shown");
        }

        #[test]
        fn test_progress_bar() {
            let mut reporter = ProgressReporter::new(false, false);
            reporter.start_progress(3, "Running scenarios");
            reporter.increment(1);
            reporter.set_message("cart.add_product");
            reporter.increment(1);
            assert_eq!(reporter.progress_bar.as_ref().unwrap().position(), 2);
            reporter.finish();
        }

        #[test]
        fn test_scenario_lines() {
            let reporter = ProgressReporter::new(false, false);
            reporter.scenario(&ScenarioRecord::passed("Open home", 12));
            reporter.scenario(&ScenarioRecord::skipped("Place order"));
            reporter.scenario(
                &ScenarioRecord::failed("Add to cart", 40, "expected dialog")
                    .with_attachment(Attachment::screenshot("target/screenshots/a.png")),
            );
        }
    }

    mod sink_tests {
        use super::*;

        #[test]
        fn test_sink_forwards_records() {
            let reporter = Arc::new(Reporter::new());
            let sink = ProgressSink::new(reporter.clone(), ProgressReporter::new(false, true));
            sink.scenario_started("Open home");
            sink.scenario_finished(&ScenarioRecord::passed("Open home", 5));
            sink.scenario_finished(&ScenarioRecord::failed("Add to cart", 5, "boom"));

            assert_eq!(reporter.total_count(), 2);
            assert_eq!(reporter.failed_count(), 1);
        }
    }
}
