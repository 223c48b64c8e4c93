//! Result and error types for blazecheck.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for blazecheck operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors that can occur while driving a scenario
#[derive(Debug, Error)]
pub enum CheckError {
    /// The entry page (or a navigation target) never reached a ready state
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A verification did not hold within its timeout
    #[error("Assertion failed ({aspect}): {message}")]
    Assertion {
        /// What was being verified, e.g. "Cart contains Nexus 6"
        aspect: String,
        /// Error message
        message: String,
    },

    /// A native dialog was missing, carried the wrong text, or blocked a command
    #[error("Alert expectation failed: {message}")]
    AlertExpectation {
        /// Expected dialog text, `None` when no dialog was expected
        expected: Option<String>,
        /// Observed dialog text, `None` when no dialog appeared
        actual: Option<String>,
        /// Error message
        message: String,
    },

    /// Session acquisition or release failed
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// The automation engine reported a protocol failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Invalid state error (operation called in wrong state)
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Configuration value could not be parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a [`CheckError`], used by reports and verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Navigation failure
    Navigation,
    /// Assertion failure
    Assertion,
    /// Alert expectation failure
    AlertExpectation,
    /// Session failure
    Session,
    /// Driver failure
    Driver,
    /// Lifecycle misuse
    InvalidState,
    /// Configuration failure
    Config,
    /// Filesystem or serialization failure
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Navigation => "navigation",
            Self::Assertion => "assertion",
            Self::AlertExpectation => "alert-expectation",
            Self::Session => "session",
            Self::Driver => "driver",
            Self::InvalidState => "invalid-state",
            Self::Config => "config",
            Self::Io => "io",
        };
        f.write_str(name)
    }
}

impl CheckError {
    /// Build a navigation error
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Build an assertion error
    pub fn assertion(aspect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Assertion {
            aspect: aspect.into(),
            message: message.into(),
        }
    }

    /// The expected dialog never appeared
    pub fn alert_missing(expected: impl Into<String>) -> Self {
        let expected = expected.into();
        Self::AlertExpectation {
            message: format!("expected dialog '{expected}' but no dialog appeared"),
            expected: Some(expected),
            actual: None,
        }
    }

    /// A dialog appeared with the wrong text
    pub fn alert_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        let expected = expected.into();
        let actual = actual.into();
        Self::AlertExpectation {
            message: format!("expected dialog '{expected}' but got '{actual}'"),
            expected: Some(expected),
            actual: Some(actual),
        }
    }

    /// A dialog nobody expected is open and blocks the page
    pub fn unexpected_alert(actual: impl Into<String>) -> Self {
        let actual = actual.into();
        Self::AlertExpectation {
            message: format!("unexpected dialog '{actual}' blocks interaction"),
            expected: None,
            actual: Some(actual),
        }
    }

    /// Build a session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Build a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Build an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Build a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Navigation { .. } => ErrorKind::Navigation,
            Self::Assertion { .. } => ErrorKind::Assertion,
            Self::AlertExpectation { .. } => ErrorKind::AlertExpectation,
            Self::Session { .. } => ErrorKind::Session,
            Self::Driver { .. } => ErrorKind::Driver,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
        }
    }

    /// Whether this error means the session itself is unusable
    #[must_use]
    pub const fn is_session(&self) -> bool {
        matches!(self, Self::Session { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod constructor_tests {
        use super::*;

        #[test]
        fn test_alert_mismatch_keeps_both_texts() {
            let err = CheckError::alert_mismatch("Product added", "Out of stock");
            match &err {
                CheckError::AlertExpectation {
                    expected, actual, ..
                } => {
                    assert_eq!(expected.as_deref(), Some("Product added"));
                    assert_eq!(actual.as_deref(), Some("Out of stock"));
                }
                other => panic!("unexpected variant {other:?}"),
            }
            let text = err.to_string();
            assert!(text.contains("Product added"));
            assert!(text.contains("Out of stock"));
        }

        #[test]
        fn test_alert_missing_has_no_actual() {
            let err = CheckError::alert_missing("Please fill out Email.");
            assert!(matches!(
                err,
                CheckError::AlertExpectation { actual: None, .. }
            ));
        }

        #[test]
        fn test_unexpected_alert_has_no_expected() {
            let err = CheckError::unexpected_alert("Product added.");
            assert!(matches!(
                err,
                CheckError::AlertExpectation { expected: None, .. }
            ));
            assert!(err.to_string().contains("blocks interaction"));
        }
    }

    mod kind_tests {
        use super::*;

        #[test]
        fn test_kinds() {
            assert_eq!(
                CheckError::navigation("u", "m").kind(),
                ErrorKind::Navigation
            );
            assert_eq!(CheckError::assertion("a", "m").kind(), ErrorKind::Assertion);
            assert_eq!(CheckError::session("m").kind(), ErrorKind::Session);
            assert_eq!(CheckError::driver("m").kind(), ErrorKind::Driver);
            assert_eq!(CheckError::config("m").kind(), ErrorKind::Config);
            let io = CheckError::from(std::io::Error::other("disk"));
            assert_eq!(io.kind(), ErrorKind::Io);
        }

        #[test]
        fn test_is_session() {
            assert!(CheckError::session("gone").is_session());
            assert!(!CheckError::driver("gone").is_session());
        }

        #[test]
        fn test_kind_display() {
            assert_eq!(ErrorKind::AlertExpectation.to_string(), "alert-expectation");
            assert_eq!(ErrorKind::InvalidState.to_string(), "invalid-state");
        }
    }
}
