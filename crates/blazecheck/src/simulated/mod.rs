//! In-process model of the DemoBlaze store.
//!
//! `SimulatedStorefront` implements [`Driver`] against a state machine of the
//! store (pages, modals, cart, native dialogs) with configurable render and
//! alert latency. It lets every scenario run offline and deterministically,
//! and its [`Fault`]s reproduce the failure modes the harness must survive.
//!
//! ```ignore
//! let driver = SimulatedStorefront::builder()
//!     .render_delay(Duration::from_millis(20))
//!     .fault(Fault::SuppressAlerts)
//!     .build();
//! ```

mod site;

pub use site::{Action, Element, Field, Layer, Modal, Page, Site, Timing};

use crate::dialog::Dialog;
use crate::driver::{Driver, ElementState, Screenshot};
use crate::locator::{Locator, Selector};
use crate::result::{CheckError, CheckResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Default delay before a page or modal is shown
pub const DEFAULT_RENDER_DELAY_MS: u64 = 10;

/// Default delay before a triggered dialog opens
pub const DEFAULT_ALERT_DELAY_MS: u64 = 10;

/// A 1x1 transparent PNG
const BLANK_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Failure modes the simulated store can reproduce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Navigation fails as if DNS did not resolve
    UnreachableHost,
    /// Navigation never completes
    StallNavigation,
    /// Triggered dialogs never open
    SuppressAlerts,
    /// "Add to cart" opens a dialog with this text instead
    AddedAlertText(String),
    /// Elements answering to this selector are never rendered
    MissingElement(Selector),
    /// Screenshots fail
    ScreenshotFails,
    /// Closing the browser fails
    CloseFails,
}

/// Builder for [`SimulatedStorefront`]
#[derive(Debug, Clone)]
pub struct SimulatedStorefrontBuilder {
    timing: Timing,
    faults: Vec<Fault>,
}

impl Default for SimulatedStorefrontBuilder {
    fn default() -> Self {
        Self {
            timing: Timing {
                render_delay: Duration::from_millis(DEFAULT_RENDER_DELAY_MS),
                alert_delay: Duration::from_millis(DEFAULT_ALERT_DELAY_MS),
                cart_load_delay: Duration::ZERO,
            },
            faults: Vec::new(),
        }
    }
}

impl SimulatedStorefrontBuilder {
    /// Delay before a page or modal is shown
    #[must_use]
    pub const fn render_delay(mut self, delay: Duration) -> Self {
        self.timing.render_delay = delay;
        self
    }

    /// Delay before a triggered dialog opens
    #[must_use]
    pub const fn alert_delay(mut self, delay: Duration) -> Self {
        self.timing.alert_delay = delay;
        self
    }

    /// Delay between the cart page showing and its rows loading
    #[must_use]
    pub const fn cart_load_delay(mut self, delay: Duration) -> Self {
        self.timing.cart_load_delay = delay;
        self
    }

    /// Inject a fault
    #[must_use]
    pub fn fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Build the driver
    #[must_use]
    pub fn build(self) -> SimulatedStorefront {
        let mut site = Site::new(self.timing);
        for fault in &self.faults {
            match fault {
                Fault::SuppressAlerts => site.suppress_alerts(),
                Fault::AddedAlertText(text) => site.set_added_alert_text(text.clone()),
                Fault::MissingElement(selector) => site.remove_element(selector.clone()),
                _ => {}
            }
        }
        SimulatedStorefront {
            site: Mutex::new(site),
            faults: self.faults,
            calls: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }
}

/// Simulated store behind the [`Driver`] trait
#[derive(Debug)]
pub struct SimulatedStorefront {
    site: Mutex<Site>,
    faults: Vec<Fault>,
    calls: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl Default for SimulatedStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedStorefront {
    /// A store with default latencies and no faults
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start a builder
    #[must_use]
    pub fn builder() -> SimulatedStorefrontBuilder {
        SimulatedStorefrontBuilder::default()
    }

    /// Names of driver calls made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Whether a driver call with this name was made
    #[must_use]
    pub fn was_called(&self, name: &str) -> bool {
        self.calls().iter().any(|c| c == name)
    }

    /// Whether [`Driver::close`] succeeded
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Product names in the cart
    #[must_use]
    pub fn cart(&self) -> Vec<&'static str> {
        self.site.lock().map(|s| s.cart_names()).unwrap_or_default()
    }

    fn has_fault(&self, fault: &Fault) -> bool {
        self.faults.contains(fault)
    }

    fn record(&self, name: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(name.to_string());
        }
    }

    /// Lock the site and apply due effects
    fn site(&self) -> CheckResult<MutexGuard<'_, Site>> {
        if self.is_closed() {
            return Err(CheckError::driver("browser has been closed"));
        }
        let mut site = self
            .site
            .lock()
            .map_err(|_| CheckError::driver("simulated store state poisoned"))?;
        site.tick(Instant::now());
        Ok(site)
    }

    /// Lock the site, refusing page commands while a dialog is open
    fn page(&self) -> CheckResult<MutexGuard<'_, Site>> {
        let site = self.site()?;
        if let Some(dialog) = site.dialog() {
            return Err(CheckError::unexpected_alert(dialog.message()));
        }
        Ok(site)
    }
}

#[async_trait]
impl Driver for SimulatedStorefront {
    async fn navigate(&self, url: &str) -> CheckResult<()> {
        self.record("navigate");
        if self.has_fault(&Fault::UnreachableHost) {
            return Err(CheckError::driver(format!(
                "net::ERR_NAME_NOT_RESOLVED at {url}"
            )));
        }
        if self.has_fault(&Fault::StallNavigation) {
            tokio::time::sleep(Duration::from_secs(3_600)).await;
        }
        self.page()?.navigate(url, Instant::now());
        Ok(())
    }

    async fn current_url(&self) -> CheckResult<String> {
        self.record("current_url");
        Ok(self.page()?.url())
    }

    async fn find(&self, locator: &Locator) -> CheckResult<Option<ElementState>> {
        Ok(self.page()?.find(locator.selector(), Instant::now()))
    }

    async fn click(&self, locator: &Locator) -> CheckResult<()> {
        self.record("click");
        self.page()?
            .click(locator.selector(), Instant::now())
            .map_err(CheckError::driver)
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> CheckResult<()> {
        self.record("set_value");
        self.page()?
            .set_value(locator.selector(), value, Instant::now())
            .map_err(CheckError::driver)
    }

    async fn dialog(&self) -> CheckResult<Option<Dialog>> {
        Ok(self.site()?.dialog().cloned())
    }

    async fn accept_dialog(&self) -> CheckResult<()> {
        self.record("accept_dialog");
        self.site()?
            .accept_dialog()
            .map(|_| ())
            .map_err(CheckError::driver)
    }

    async fn screenshot(&self) -> CheckResult<Screenshot> {
        self.record("screenshot");
        if self.has_fault(&Fault::ScreenshotFails) {
            return Err(CheckError::driver("screenshot capture failed"));
        }
        let _site = self.page()?;
        Ok(Screenshot::new(BLANK_PNG.to_vec(), 1, 1))
    }

    async fn page_source(&self) -> CheckResult<String> {
        self.record("page_source");
        Ok(self.page()?.source(Instant::now()))
    }

    async fn close(&self) -> CheckResult<()> {
        self.record("close");
        if self.has_fault(&Fault::CloseFails) {
            return Err(CheckError::session("browser process did not exit"));
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
