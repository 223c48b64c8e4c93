//! CLI command definitions using clap

use crate::config::{ColorChoice, ReportKind};
use crate::error::CliResult;
use blazecheck::{BrowserKind, CaseFilter, HarnessConfig, Suite, WindowSize};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// blazecheck: regression suite for the DemoBlaze product store
#[derive(Parser, Debug)]
#[command(name = "blazecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (failures only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the store
    Run(RunArgs),

    /// List scenarios without running them
    List(ListArgs),

    /// Show the resolved harness configuration
    Config(ConfigArgs),
}

/// Scenario selection shared by `run` and `list`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this suite (home, cart, contact, order); repeatable
    #[arg(short, long)]
    pub suite: Vec<Suite>,

    /// Only cases carrying every given tag
    #[arg(short, long)]
    pub tag: Vec<String>,

    /// Only cases whose id or name contains this text
    #[arg(short, long)]
    pub name: Option<String>,
}

impl FilterArgs {
    /// As a library filter
    #[must_use]
    pub fn to_filter(&self) -> CaseFilter {
        let mut filter = CaseFilter::new();
        for suite in &self.suite {
            filter = filter.suite(*suite);
        }
        for tag in &self.tag {
            filter = filter.tag(tag.clone());
        }
        if let Some(name) = &self.name {
            filter = filter.name(name.clone());
        }
        filter
    }
}

/// Harness overrides; unset flags fall back to `BLAZECHECK_*` and defaults
#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct HarnessArgs {
    /// Automation engine (chrome, chromium, simulated)
    #[arg(long, env = "BLAZECHECK_BROWSER")]
    pub browser: Option<BrowserKind>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Window size as WIDTHxHEIGHT
    #[arg(long, env = "BLAZECHECK_WINDOW_SIZE")]
    pub window_size: Option<WindowSize>,

    /// Directory for failure screenshots and page sources
    #[arg(long, env = "BLAZECHECK_ARTIFACTS_DIR")]
    pub artifacts_dir: Option<PathBuf>,

    /// Do not capture artifacts on failure
    #[arg(long)]
    pub no_artifacts: bool,

    /// Store entry URL
    #[arg(long, env = "BLAZECHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Element wait timeout in milliseconds
    #[arg(long, env = "BLAZECHECK_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Alert wait timeout in milliseconds
    #[arg(long, env = "BLAZECHECK_ALERT_TIMEOUT_MS")]
    pub alert_timeout_ms: Option<u64>,

    /// Page load timeout in milliseconds
    #[arg(long, env = "BLAZECHECK_NAVIGATION_TIMEOUT_MS")]
    pub navigation_timeout_ms: Option<u64>,

    /// Cart emptiness must hold this long, in milliseconds
    #[arg(long, env = "BLAZECHECK_SETTLE_MS")]
    pub settle_ms: Option<u64>,

    /// Chrome binary
    #[arg(long, env = "BLAZECHECK_CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Add the Chrome flags needed inside a container
    #[arg(long)]
    pub container: bool,
}

impl HarnessArgs {
    /// Defaults, then `BLAZECHECK_*`, then these flags
    pub fn resolve(&self) -> CliResult<HarnessConfig> {
        let mut config = HarnessConfig::from_env()?;
        if let Some(browser) = self.browser {
            config = config.with_browser(browser);
        }
        if self.headless {
            config = config.with_headless(true);
        }
        if let Some(size) = self.window_size {
            config = config.with_window_size(size);
        }
        if let Some(dir) = &self.artifacts_dir {
            config = config.with_artifacts_dir(dir);
        }
        if self.no_artifacts {
            config = config.with_capture_artifacts(false);
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(ms) = self.timeout_ms {
            config.timeouts.element_ms = ms;
        }
        if let Some(ms) = self.alert_timeout_ms {
            config.timeouts.alert_ms = ms;
        }
        if let Some(ms) = self.navigation_timeout_ms {
            config.timeouts.navigation_ms = ms;
        }
        if let Some(ms) = self.settle_ms {
            config.timeouts.settle_ms = ms;
        }
        if let Some(path) = &self.chrome_path {
            config.chrome_executable = Some(path.clone());
        }
        if self.container {
            config = config.in_container();
        }
        Ok(config)
    }
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario selection
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Harness overrides
    #[command(flatten)]
    pub harness: HarnessArgs,

    /// Scenarios run at once (0 = one per core)
    #[arg(short = 'j', long, default_value = "1")]
    pub jobs: usize,

    /// Stop after the first scenario that does not pass
    #[arg(long)]
    pub fail_fast: bool,

    /// Write a report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, default_value = "json")]
    pub format: ReportFormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Scenario selection
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Harness overrides
    #[command(flatten)]
    pub harness: HarnessArgs,

    /// Print JSON instead of key = value lines
    #[arg(long)]
    pub json: bool,
}

/// Report format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ReportFormatArg {
    /// JSON
    #[default]
    Json,
    /// `JUnit` XML
    Junit,
}

impl From<ReportFormatArg> for ReportKind {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Json => Self::Json,
            ReportFormatArg::Junit => Self::Junit,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Detect terminal
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
