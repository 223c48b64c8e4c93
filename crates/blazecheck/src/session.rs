//! Per-scenario browser session.
//!
//! A [`Session`] wraps one [`Driver`] together with the scenario's
//! [`HarnessConfig`]. Cloning is cheap and every clone refers to the same
//! browser; screens each hold a clone.
//!
//! Two rules are enforced here rather than in every screen:
//!
//! - element queries poll up to the configured timeout and convert expiry
//!   into an [`Assertion`](CheckError::Assertion) failure
//! - while a native dialog is open, every command except
//!   [`Session::expect_alert`] and [`Session::open_dialog`] fails with an
//!   [`AlertExpectation`](CheckError::AlertExpectation) error

use crate::config::HarnessConfig;
use crate::dialog::{AlertExpectation, Dialog};
use crate::driver::{Driver, ElementState, Screenshot};
use crate::locator::{Locator, TextMatch};
use crate::result::{CheckError, CheckResult};
use crate::wait::{WaitOptions, WaitOutcome, Waiter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Handle to the browser of one scenario
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    id: Uuid,
    driver: Arc<dyn Driver>,
    config: HarnessConfig,
    released: AtomicBool,
}

impl Session {
    /// Wrap a driver
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, config: HarnessConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                driver,
                config,
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Unique session id
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Configuration this session was opened with
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.inner.config
    }

    /// Whether [`release`](Self::release) has run
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::SeqCst)
    }

    fn driver(&self) -> CheckResult<&dyn Driver> {
        if self.is_released() {
            return Err(CheckError::session(format!(
                "session {} already released",
                self.inner.id
            )));
        }
        Ok(self.inner.driver.as_ref())
    }

    async fn guard(&self) -> CheckResult<&dyn Driver> {
        let driver = self.driver()?;
        if let Some(dialog) = driver.dialog().await? {
            return Err(CheckError::unexpected_alert(dialog.message()));
        }
        Ok(driver)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Load `url`, bounded by the navigation timeout
    pub async fn open(&self, url: &str) -> CheckResult<()> {
        let driver = self.guard().await?;
        let limit = self.inner.config.timeouts.navigation();
        debug!(url, timeout_ms = limit.timeout_ms, "navigating");
        match tokio::time::timeout(limit.timeout(), driver.navigate(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(CheckError::Driver { message })) => Err(CheckError::navigation(url, message)),
            Ok(Err(other)) => Err(other),
            Err(_) => Err(CheckError::navigation(
                url,
                format!("page did not load within {}ms", limit.timeout_ms),
            )),
        }
    }

    /// URL of the current document
    pub async fn current_url(&self) -> CheckResult<String> {
        self.guard().await?.current_url().await
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// Look an element up once, without waiting
    pub async fn element(&self, locator: &Locator) -> CheckResult<Option<ElementState>> {
        self.guard().await?.find(locator).await
    }

    async fn poll<T, F>(
        &self,
        options: WaitOptions,
        accept: F,
        locator: &Locator,
    ) -> CheckResult<WaitOutcome<T>>
    where
        F: Fn(Option<ElementState>) -> Option<T>,
    {
        debug!(locator = %locator, timeout_ms = options.timeout_ms, "polling");
        let accept = &accept;
        Waiter::new(options)
            .until(|| {
                let lookup = self.element(locator);
                async move { Ok(accept(lookup.await?)) }
            })
            .await
    }

    /// Wait until the element is visible
    pub async fn wait_visible(&self, locator: &Locator, aspect: &str) -> CheckResult<ElementState> {
        let options = self.inner.config.timeouts.element();
        let outcome = self
            .poll(options, |state| state.filter(|s| s.visible), locator)
            .await?;
        outcome.into_ready().ok_or_else(|| {
            CheckError::assertion(
                aspect,
                format!("{locator} not visible within {}ms", options.timeout_ms),
            )
        })
    }

    /// Wait until the element is visible and its text matches
    pub async fn wait_text(
        &self,
        locator: &Locator,
        expected: &TextMatch,
        aspect: &str,
    ) -> CheckResult<()> {
        let options = self.inner.config.timeouts.element();
        let outcome = self
            .poll(
                options,
                |state| state.filter(|s| s.visible && expected.matches(&s.text)),
                locator,
            )
            .await?;
        if !outcome.is_timed_out() {
            return Ok(());
        }
        let message = match self.element(locator).await? {
            Some(state) if state.visible => expected.describe_mismatch(&state.text),
            Some(_) => format!("{locator} present but hidden"),
            None => format!("{locator} not found"),
        };
        Err(CheckError::assertion(
            aspect,
            format!("{message} (after {}ms)", options.timeout_ms),
        ))
    }

    /// Wait until the element is absent or hidden
    pub async fn wait_hidden(&self, locator: &Locator, aspect: &str) -> CheckResult<()> {
        let options = self.inner.config.timeouts.element();
        let outcome = self
            .poll(
                options,
                |state| match state {
                    Some(s) if s.visible => None,
                    _ => Some(()),
                },
                locator,
            )
            .await?;
        if outcome.is_timed_out() {
            return Err(CheckError::assertion(
                aspect,
                format!("{locator} still visible after {}ms", options.timeout_ms),
            ));
        }
        Ok(())
    }

    /// Check the element stays absent or hidden for the settle window
    pub async fn hold_hidden(&self, locator: &Locator, aspect: &str) -> CheckResult<()> {
        let options = self.inner.config.timeouts.settle();
        let outcome = self
            .poll(options, |state| state.filter(|s| s.visible), locator)
            .await?;
        match outcome.into_ready() {
            Some(state) => Err(CheckError::assertion(
                aspect,
                format!(
                    "{locator} appeared within {}ms ('{}')",
                    options.timeout_ms,
                    state.text.trim()
                ),
            )),
            None => Ok(()),
        }
    }

    /// Wait for the element to become visible, then click it
    pub async fn click(&self, locator: &Locator) -> CheckResult<()> {
        self.wait_visible(locator, &format!("click {}", locator.description()))
            .await?;
        debug!(locator = %locator, "click");
        self.guard().await?.click(locator).await
    }

    /// Wait for the input to become visible, then replace its value
    pub async fn fill(&self, locator: &Locator, value: &str) -> CheckResult<()> {
        self.wait_visible(locator, &format!("fill {}", locator.description()))
            .await?;
        debug!(locator = %locator, value, "fill");
        self.guard().await?.set_value(locator, value).await
    }

    // =========================================================================
    // Dialogs
    // =========================================================================

    /// The native dialog currently open, if any
    pub async fn open_dialog(&self) -> CheckResult<Option<Dialog>> {
        self.driver()?.dialog().await
    }

    /// Wait for a dialog, accept it, then compare its text.
    ///
    /// The dialog is accepted even when the text does not match, so the page
    /// is usable for artifact capture and teardown.
    pub async fn expect_alert(&self, expectation: AlertExpectation) -> CheckResult<Dialog> {
        let driver = self.driver()?;
        let options = self.inner.config.timeouts.alert();
        debug!(
            expected = expectation.expected(),
            timeout_ms = options.timeout_ms,
            "waiting for dialog"
        );
        let outcome = Waiter::new(options).until(|| driver.dialog()).await?;
        let Some(dialog) = outcome.into_ready() else {
            return Err(CheckError::alert_missing(expectation.expected()));
        };
        driver.accept_dialog().await?;
        expectation.check(Some(&dialog))?;
        Ok(dialog)
    }

    /// Accept whatever dialog is open; returns it
    pub async fn dismiss_open_dialog(&self) -> CheckResult<Option<Dialog>> {
        let driver = self.driver()?;
        let dialog = driver.dialog().await?;
        if dialog.is_some() {
            driver.accept_dialog().await?;
        }
        Ok(dialog)
    }

    // =========================================================================
    // Artifacts and teardown
    // =========================================================================

    /// Capture the viewport
    pub async fn screenshot(&self) -> CheckResult<Screenshot> {
        self.driver()?.screenshot().await
    }

    /// Serialized DOM of the current document
    pub async fn page_source(&self) -> CheckResult<String> {
        self.driver()?.page_source().await
    }

    /// Close the browser. A second call is a no-op.
    pub async fn release(&self) -> CheckResult<()> {
        if self.inner.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!(session = %self.inner.id, "releasing session");
        self.inner
            .driver
            .close()
            .await
            .map_err(|e| match e {
                CheckError::Session { .. } => e,
                other => CheckError::session(format!("release failed: {other}")),
            })
    }
}
