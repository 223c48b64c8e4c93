//! Native browser dialogs and alert expectations.
//!
//! The storefront reports "Product added.", form validation problems and
//! contact confirmations through `window.alert`. While such a dialog is open
//! the page accepts no input, so the session refuses every other command
//! until the dialog is consumed through an [`AlertExpectation`].

use crate::locator::TextMatch;
use crate::result::{CheckError, CheckResult};
use serde::{Deserialize, Serialize};

/// Type of browser dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogType {
    /// Alert dialog (OK button only)
    Alert,
    /// Confirm dialog (OK/Cancel buttons)
    Confirm,
    /// Prompt dialog (text input + OK/Cancel)
    Prompt,
    /// Before unload dialog (Leave/Stay buttons)
    BeforeUnload,
}

impl DialogType {
    /// Parse the CDP dialog type name
    #[must_use]
    pub fn from_cdp(name: &str) -> Self {
        match name {
            "confirm" => Self::Confirm,
            "prompt" => Self::Prompt,
            "beforeunload" => Self::BeforeUnload,
            _ => Self::Alert,
        }
    }
}

impl std::fmt::Display for DialogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Confirm => write!(f, "confirm"),
            Self::Prompt => write!(f, "prompt"),
            Self::BeforeUnload => write!(f, "beforeunload"),
        }
    }
}

/// An open native dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    dialog_type: DialogType,
    message: String,
}

impl Dialog {
    /// Create a new dialog
    #[must_use]
    pub fn new(dialog_type: DialogType, message: impl Into<String>) -> Self {
        Self {
            dialog_type,
            message: message.into(),
        }
    }

    /// Create an alert dialog
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self::new(DialogType::Alert, message)
    }

    /// Get dialog type
    #[must_use]
    pub const fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// Get dialog message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The dialog a scenario expects right after a dialog-triggering action.
///
/// Consumed by [`Session::expect_alert`](crate::session::Session::expect_alert),
/// which accepts the dialog before comparing so a mismatch never leaves the
/// page blocked.
#[must_use = "an alert expectation does nothing until passed to Session::expect_alert"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertExpectation {
    text: TextMatch,
}

impl AlertExpectation {
    /// Expect a dialog whose text equals `text`
    pub fn exact(text: impl Into<String>) -> Self {
        Self {
            text: TextMatch::exact(text),
        }
    }

    /// Expect a dialog whose text contains `text`
    pub fn containing(text: impl Into<String>) -> Self {
        Self {
            text: TextMatch::contains(text),
        }
    }

    /// Expected text
    #[must_use]
    pub fn expected(&self) -> &str {
        self.text.expected()
    }

    /// Text comparison mode
    #[must_use]
    pub const fn text_match(&self) -> &TextMatch {
        &self.text
    }

    /// Judge the observed dialog, `None` meaning no dialog appeared in time
    pub fn check(&self, observed: Option<&Dialog>) -> CheckResult<()> {
        match observed {
            None => Err(CheckError::alert_missing(self.expected())),
            Some(dialog) if self.text.matches(dialog.message()) => Ok(()),
            Some(dialog) => Err(CheckError::alert_mismatch(
                self.expected(),
                dialog.message(),
            )),
        }
    }
}
