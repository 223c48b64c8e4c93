//! Automation-engine boundary.
//!
//! Screens never talk to a browser directly. They go through a
//! [`Session`](crate::session::Session), which owns one `Driver`:
//!
//! - [`ChromiumDriver`](crate::browser::ChromiumDriver) - real Chrome over CDP
//!   (feature `browser`)
//! - [`SimulatedStorefront`](crate::simulated::SimulatedStorefront) - an
//!   in-process model of the store for offline runs and the crate's own tests
//!
//! Driver calls are single-shot: no waiting, no retrying. Polling lives in
//! [`wait`](crate::wait).

use crate::dialog::Dialog;
use crate::locator::Locator;
use crate::result::CheckResult;
use async_trait::async_trait;
use std::time::SystemTime;

/// Observable state of one located element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementState {
    /// Rendered and not hidden
    pub visible: bool,
    /// Text content
    pub text: String,
}

impl ElementState {
    /// A visible element with the given text
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            visible: true,
            text: text.into(),
        }
    }

    /// A present but hidden element
    #[must_use]
    pub fn hidden(text: impl Into<String>) -> Self {
        Self {
            visible: false,
            text: text.into(),
        }
    }
}

/// Screenshot data with metadata
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Timestamp when screenshot was taken
    pub timestamp: SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: SystemTime::now(),
        }
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check if screenshot is valid (has data)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && self.width > 0 && self.height > 0
    }
}

/// Browser automation primitives used by sessions
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Load `url` in the current tab
    async fn navigate(&self, url: &str) -> CheckResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> CheckResult<String>;

    /// Look the element up once; `None` when it is not in the document
    async fn find(&self, locator: &Locator) -> CheckResult<Option<ElementState>>;

    /// Click the element
    async fn click(&self, locator: &Locator) -> CheckResult<()>;

    /// Replace the value of an input element
    async fn set_value(&self, locator: &Locator, value: &str) -> CheckResult<()>;

    /// The native dialog currently open, if any
    async fn dialog(&self) -> CheckResult<Option<Dialog>>;

    /// Accept (OK) the open native dialog
    async fn accept_dialog(&self) -> CheckResult<()>;

    /// Capture the viewport
    async fn screenshot(&self) -> CheckResult<Screenshot>;

    /// Serialized DOM of the current document
    async fn page_source(&self) -> CheckResult<String>;

    /// Tear the browser down
    async fn close(&self) -> CheckResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod screenshot_tests {
        use super::*;

        #[test]
        fn test_validity() {
            assert!(Screenshot::new(vec![1, 2, 3], 10, 10).is_valid());
            assert!(!Screenshot::new(Vec::new(), 10, 10).is_valid());
            assert!(!Screenshot::new(vec![1], 0, 10).is_valid());
        }

        #[test]
        fn test_size_bytes() {
            assert_eq!(Screenshot::new(vec![0; 64], 1, 1).size_bytes(), 64);
        }
    }

    mod element_state_tests {
        use super::*;

        #[test]
        fn test_constructors() {
            assert!(ElementState::visible("Cart").visible);
            assert!(!ElementState::hidden("Cart").visible);
        }
    }
}
