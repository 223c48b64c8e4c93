//! Chrome over the DevTools protocol.
//!
//! One [`ChromiumDriver`] owns one browser process with a single page.
//! Element lookups run small JavaScript lookups; native dialogs are observed
//! through `Page.javascriptDialogOpening` events and answered with
//! `Page.handleJavaScriptDialog`.

use crate::config::{HarnessConfig, WindowSize};
use crate::dialog::{Dialog, DialogType};
use crate::driver::{Driver, ElementState, Screenshot};
use crate::locator::Locator;
use crate::result::{CheckError, CheckResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams, EventJavascriptDialogOpening,
    HandleJavaScriptDialogParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct Lookup {
    visible: bool,
    text: String,
}

/// Real browser behind the [`Driver`] trait
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: tokio::sync::Mutex<Browser>,
    page: Page,
    window: WindowSize,
    dialog: Arc<Mutex<Option<Dialog>>>,
    handler: JoinHandle<()>,
    listener: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch Chrome as described by `config` and open a blank page
    ///
    /// # Errors
    ///
    /// `Session` if the browser cannot be started or the page not created
    pub async fn launch(config: &HarnessConfig) -> CheckResult<Self> {
        let window = config.window_size;
        let mut builder = BrowserConfig::builder().window_size(window.width, window.height);
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        for arg in &config.browser_args {
            builder = builder.arg(arg.as_str());
        }
        let cdp_config = builder.build().map_err(CheckError::session)?;

        info!(
            window = %window,
            headless = config.headless,
            "launching chrome"
        );
        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| CheckError::session(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CheckError::session(format!("cannot open page: {e}")))?;

        let mut openings = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| CheckError::session(format!("cannot watch dialogs: {e}")))?;
        let dialog = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&dialog);
        let listener = tokio::spawn(async move {
            while let Some(event) = openings.next().await {
                let opened = Dialog::new(
                    DialogType::from_cdp(event.r#type.as_ref()),
                    event.message.clone(),
                );
                debug!(message = opened.message(), "dialog opened");
                if let Ok(mut current) = slot.lock() {
                    *current = Some(opened);
                }
            }
        });

        Ok(Self {
            browser: tokio::sync::Mutex::new(browser),
            page,
            window,
            dialog,
            handler,
            listener,
        })
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, js: String) -> CheckResult<T> {
        self.page
            .evaluate(js)
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?
            .into_value()
            .map_err(|e| CheckError::driver(e.to_string()))
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> CheckResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;
        Ok(())
    }

    async fn current_url(&self) -> CheckResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn find(&self, locator: &Locator) -> CheckResult<Option<ElementState>> {
        let js = format!(
            "(() => {{ const el = {query}; if (!el) return 'null'; \
             const style = window.getComputedStyle(el); \
             const visible = !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length) \
               && style.visibility !== 'hidden' && style.display !== 'none'; \
             const text = (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA') \
               ? el.value : (el.innerText || el.textContent || ''); \
             return JSON.stringify({{ visible, text }}); }})()",
            query = locator.selector().to_query()
        );
        let raw: String = self.eval(js).await?;
        let found: Option<Lookup> = serde_json::from_str(&raw)?;
        Ok(found.map(|p| ElementState {
            visible: p.visible,
            text: p.text,
        }))
    }

    async fn click(&self, locator: &Locator) -> CheckResult<()> {
        // the click is deferred so a dialog it opens cannot block the evaluation
        let js = format!(
            "(() => {{ const el = {query}; if (!el) return false; \
             el.scrollIntoView({{ block: 'center' }}); \
             setTimeout(() => el.click(), 0); return true; }})()",
            query = locator.selector().to_query()
        );
        if self.eval::<bool>(js).await? {
            Ok(())
        } else {
            Err(CheckError::driver(format!("no such element: {locator}")))
        }
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> CheckResult<()> {
        let js = format!(
            "(() => {{ const el = {query}; if (!el || !('value' in el)) return false; \
             el.focus(); el.value = {value}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()",
            query = locator.selector().to_query(),
            value = serde_json::to_string(value)?
        );
        if self.eval::<bool>(js).await? {
            Ok(())
        } else {
            Err(CheckError::driver(format!("not an input: {locator}")))
        }
    }

    async fn dialog(&self) -> CheckResult<Option<Dialog>> {
        self.dialog
            .lock()
            .map(|d| d.clone())
            .map_err(|_| CheckError::driver("dialog state poisoned"))
    }

    async fn accept_dialog(&self) -> CheckResult<()> {
        self.page
            .execute(HandleJavaScriptDialogParams::new(true))
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;
        if let Ok(mut current) = self.dialog.lock() {
            *current = None;
        }
        Ok(())
    }

    async fn screenshot(&self) -> CheckResult<Screenshot> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let shot = self
            .page
            .execute(params)
            .await
            .map_err(|e| CheckError::driver(e.to_string()))?;

        use base64::Engine;
        let data = base64::engine::general_purpose::STANDARD
            .decode(&shot.data)
            .map_err(|e| CheckError::driver(e.to_string()))?;
        Ok(Screenshot::new(data, self.window.width, self.window.height))
    }

    async fn page_source(&self) -> CheckResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| CheckError::driver(e.to_string()))
    }

    async fn close(&self) -> CheckResult<()> {
        self.listener.abort();
        let mut browser = self.browser.lock().await;
        let closed = browser
            .close()
            .await
            .map_err(|e| CheckError::session(format!("browser close failed: {e}")));
        self.handler.abort();
        closed.map(|_| ())
    }
}
