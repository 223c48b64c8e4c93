//! Per-scenario harness configuration.
//!
//! A [`HarnessConfig`] is a plain value: built once (defaults, then
//! environment, then CLI flags) and cloned into every session. Nothing reads
//! or writes process-wide browser settings after start-up.

use crate::catalog::BASE_URL;
use crate::result::{CheckError, CheckResult};
use crate::wait::{
    WaitOptions, DEFAULT_ALERT_TIMEOUT_MS, DEFAULT_ELEMENT_TIMEOUT_MS,
    DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SETTLE_MS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BLAZECHECK_";

/// Default artifact folder
pub const DEFAULT_ARTIFACTS_DIR: &str = "target/screenshots";

/// Chrome flags for running inside a container
pub const CONTAINER_BROWSER_ARGS: [&str; 4] = [
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-extensions",
];

// =============================================================================
// BROWSER KIND
// =============================================================================

/// Which automation engine backs a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserKind {
    /// Chrome or Chromium over the DevTools protocol
    #[default]
    Chrome,
    /// In-process storefront model
    Simulated,
}

impl FromStr for BrowserKind {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "simulated" | "sim" => Ok(Self::Simulated),
            other => Err(CheckError::config(format!(
                "unsupported browser '{other}' (expected chrome, chromium or simulated)"
            ))),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => write!(f, "chrome"),
            Self::Simulated => write!(f, "simulated"),
        }
    }
}

// =============================================================================
// WINDOW SIZE
// =============================================================================

/// Browser window size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl FromStr for WindowSize {
    type Err = CheckError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1920x1080`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CheckError::config(format!("invalid window size '{s}' (expected WxH)"));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Timeouts applied by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Element visibility and text waits
    pub element_ms: u64,
    /// Waiting for a native dialog
    pub alert_ms: u64,
    /// Page loads
    pub navigation_ms: u64,
    /// Poll interval for all waits
    pub poll_interval_ms: u64,
    /// How long an absence must hold before it counts
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

const fn default_settle_ms() -> u64 {
    DEFAULT_SETTLE_MS
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            alert_ms: DEFAULT_ALERT_TIMEOUT_MS,
            navigation_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }
}

impl Timeouts {
    /// Short timeouts for the simulated storefront
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            element_ms: 1_000,
            alert_ms: 1_000,
            navigation_ms: 2_000,
            poll_interval_ms: 5,
            settle_ms: 50,
        }
    }

    /// Wait options for element checks
    #[must_use]
    pub const fn element(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.element_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wait options for dialogs
    #[must_use]
    pub const fn alert(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.alert_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wait options for an absence that must hold
    #[must_use]
    pub const fn settle(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.settle_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wait options for page readiness
    #[must_use]
    pub const fn navigation(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.navigation_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

// =============================================================================
// HARNESS CONFIG
// =============================================================================

/// Configuration handed to every scenario session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Automation engine
    pub browser: BrowserKind,
    /// Window size
    pub window_size: WindowSize,
    /// Run without a visible window
    pub headless: bool,
    /// Capture screenshot and page source on failure
    pub capture_artifacts: bool,
    /// Where artifacts are written
    pub artifacts_dir: PathBuf,
    /// Entry URL of the storefront
    pub base_url: String,
    /// Explicit Chrome binary
    pub chrome_executable: Option<PathBuf>,
    /// Extra browser flags
    pub browser_args: Vec<String>,
    /// Timeouts
    pub timeouts: Timeouts,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chrome,
            window_size: WindowSize::default(),
            headless: false,
            capture_artifacts: true,
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            base_url: BASE_URL.to_string(),
            chrome_executable: None,
            browser_args: Vec::new(),
            timeouts: Timeouts::default(),
        }
    }
}

impl HarnessConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for the in-process storefront with short timeouts
    #[must_use]
    pub fn simulated() -> Self {
        Self {
            browser: BrowserKind::Simulated,
            headless: true,
            timeouts: Timeouts::fast(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `BLAZECHECK_*` environment variables
    pub fn from_env() -> CheckResult<Self> {
        Self::default().with_lookup(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup`, keyed by full variable name
    pub fn with_lookup<F>(mut self, lookup: F) -> CheckResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = get("BROWSER") {
            self.browser = v.parse()?;
        }
        if let Some(v) = get("WINDOW_SIZE") {
            self.window_size = v.parse()?;
        }
        if let Some(v) = get("HEADLESS") {
            self.headless = parse_bool("HEADLESS", &v)?;
        }
        if let Some(v) = get("CAPTURE_ARTIFACTS") {
            self.capture_artifacts = parse_bool("CAPTURE_ARTIFACTS", &v)?;
        }
        if let Some(v) = get("ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(v);
        }
        if let Some(v) = get("BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = get("CHROME_PATH") {
            self.chrome_executable = Some(PathBuf::from(v));
        }
        if let Some(v) = get("CONTAINER") {
            if parse_bool("CONTAINER", &v)? {
                self = self.in_container();
            }
        }
        if let Some(v) = get("TIMEOUT_MS") {
            self.timeouts.element_ms = parse_ms("TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("ALERT_TIMEOUT_MS") {
            self.timeouts.alert_ms = parse_ms("ALERT_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("NAVIGATION_TIMEOUT_MS") {
            self.timeouts.navigation_ms = parse_ms("NAVIGATION_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("SETTLE_MS") {
            self.timeouts.settle_ms = parse_ms("SETTLE_MS", &v)?;
        }
        Ok(self)
    }

    /// Set browser
    #[must_use]
    pub const fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Set window size
    #[must_use]
    pub const fn with_window_size(mut self, size: WindowSize) -> Self {
        self.window_size = size;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Enable or disable failure artifacts
    #[must_use]
    pub const fn with_capture_artifacts(mut self, capture: bool) -> Self {
        self.capture_artifacts = capture;
        self
    }

    /// Set artifact folder
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    /// Set entry URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Add the flags Chrome needs inside a container
    #[must_use]
    pub fn in_container(mut self) -> Self {
        for arg in CONTAINER_BROWSER_ARGS {
            if !self.browser_args.iter().any(|a| a == arg) {
                self.browser_args.push(arg.to_string());
            }
        }
        self
    }
}

fn parse_bool(name: &str, value: &str) -> CheckResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(CheckError::config(format!(
            "{ENV_PREFIX}{name}: expected a boolean, got '{value}'"
        ))),
    }
}

fn parse_ms(name: &str, value: &str) -> CheckResult<u64> {
    value.trim().parse().map_err(|_| {
        CheckError::config(format!(
            "{ENV_PREFIX}{name}: expected milliseconds, got '{value}'"
        ))
    })
}
