//! blazecheck: screen-object regression suite for the DemoBlaze product store
//!
//! The crate drives `https://www.demoblaze.com` through typed screen objects
//! and checks what a shopper sees: product listings and details, the cart,
//! checkout and the contact form, including the native alerts the store
//! raises.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ suite cases  │──►│  Sequencer   │──►│   screens    │──►│   Session    │
//! │ / BDD steps  │   │ Given/When/  │   │ Home, Cart,  │   │ waits, alert │
//! │              │   │ Then journal │   │ Order, ...   │   │ guard        │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!        ▲                                                        │ Driver
//! ┌──────┴───────┐                                    ┌───────────┴──────────┐
//! │   Harness    │ acquire / capture / release        │ ChromiumDriver (CDP) │
//! │  + Reporter  │                                    │ SimulatedStorefront  │
//! └──────────────┘                                    └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blazecheck::prelude::*;
//!
//! let harness = Harness::new(HarnessConfig::from_env()?)?;
//! let record = harness
//!     .run("Samsung galaxy s6 details", |session, mut seq| async move {
//!         let home = HomeScreen::new(session);
//!         seq.given("I am on the home page", home.open()).await?;
//!         let details = seq
//!             .when("I click on \"Samsung galaxy s6\" product", home.click_product("Samsung galaxy s6"))
//!             .await?;
//!         seq.then(
//!             "the price includes tax",
//!             details.verify_product_details("Samsung galaxy s6", "$360 *includes tax"),
//!         )
//!         .await?;
//!         Ok(())
//!     })
//!     .await;
//! assert!(record.status.is_passed());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Real Chrome over CDP
#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc)]
pub mod browser;

/// Canonical products, alert texts and form data
pub mod catalog;

/// Harness configuration from defaults, environment and flags
#[allow(clippy::missing_errors_doc)]
pub mod config;

/// Native dialogs and alert expectations
pub mod dialog;

/// The automation-engine trait
pub mod driver;

/// Scenario lifecycle, session factories and failure capture
#[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
pub mod harness;

/// Element locators and text matching
pub mod locator;

/// Summary, JSON and JUnit reporting
#[allow(
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::format_push_string
)]
pub mod reporter;

/// Error type
pub mod result;

/// Screen objects
#[allow(clippy::missing_errors_doc)]
pub mod screen;

/// Given/When/Then sequencing
#[allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]
pub mod sequencer;

/// Per-scenario browser session
#[allow(clippy::missing_errors_doc)]
pub mod session;

/// In-process model of the store
#[allow(clippy::missing_errors_doc, clippy::too_many_lines)]
pub mod simulated;

/// Regression scenarios
#[allow(clippy::missing_errors_doc)]
pub mod suite;

/// Polling primitives
pub mod wait;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use catalog::{ContactMessage, OrderDetails, Product, BASE_URL, PRODUCTS};
pub use config::{BrowserKind, HarnessConfig, Timeouts, WindowSize};
pub use dialog::{AlertExpectation, Dialog, DialogType};
pub use driver::{Driver, ElementState, Screenshot};
pub use harness::{
    factory_for, ActiveScenario, Harness, Lifecycle, ScenarioState, SessionFactory,
    SimulatedFactory,
};
#[cfg(feature = "browser")]
pub use harness::ChromeFactory;
pub use locator::{Locator, LocatorTemplate, Selector, Strategy, TextMatch};
pub use reporter::{
    Attachment, FailureMode, NullSink, ReportSink, Reporter, ScenarioRecord, TestStatus,
};
pub use result::{CheckError, CheckResult, ErrorKind};
pub use screen::{
    CartScreen, ContactModal, HomeScreen, OrderModal, ProductDetailsScreen, Screen,
};
pub use sequencer::{Keyword, Sequencer, StepJournal, StepRecord, StepStatus};
pub use session::Session;
pub use simulated::{Fault, SimulatedStorefront, SimulatedStorefrontBuilder};
pub use suite::{CaseFilter, ScenarioCase, Suite};
pub use wait::{WaitOptions, WaitOutcome, Waiter};

/// Everything a scenario author needs
pub mod prelude {
    pub use super::catalog::*;
    pub use super::config::*;
    pub use super::dialog::*;
    pub use super::harness::*;
    pub use super::reporter::{FailureMode, Reporter, ScenarioRecord, TestStatus};
    pub use super::result::*;
    pub use super::screen::*;
    pub use super::sequencer::*;
    pub use super::session::Session;
    pub use super::simulated::{Fault, SimulatedStorefront};
    pub use super::suite::{CaseFilter, ScenarioCase, Suite};
    pub use super::wait::{WaitOptions, Waiter};
}
