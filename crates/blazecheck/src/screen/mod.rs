//! Screen objects for the product store.
//!
//! One type per logical screen or modal. Each owns its locator set and a
//! [`Session`] clone, and exposes three kinds of method:
//!
//! - `verify_*` assert visibility or text and return `&Self` so checks chain
//! - `click_*` / `fill_*` that stay on the screen also return `&Self`
//! - actions that leave the screen return the destination screen, already
//!   waited to readiness
//!
//! ```ignore
//! let details = HomeScreen::new(session)
//!     .open().await?
//!     .verify_navigation_elements().await?
//!     .click_product("Samsung galaxy s6").await?;
//! details.verify_product_details("Samsung galaxy s6", "$360 *includes tax").await?;
//! ```

pub mod cart;
pub mod contact;
pub mod home;
pub mod nav;
pub mod order;
pub mod product;

pub use cart::{CartLocators, CartScreen};
pub use contact::{ContactLocators, ContactModal};
pub use home::{HomeLocators, HomeScreen};
pub use nav::NavLocators;
pub use order::{OrderLocators, OrderModal};
pub use product::{ProductDetailsScreen, ProductLocators};

use crate::locator::Locator;
use crate::result::CheckResult;
use crate::session::Session;
use async_trait::async_trait;
use tracing::debug;

/// A screen or modal of the store
#[async_trait]
pub trait Screen: Send + Sync + std::fmt::Debug {
    /// Name used in logs and failure messages
    fn name(&self) -> &'static str;

    /// Session this screen drives
    fn session(&self) -> &Session;

    /// Elements whose visibility means the screen is ready
    fn ready_markers(&self) -> Vec<&Locator>;

    /// Wait until every ready marker is visible
    async fn wait_ready(&self) -> CheckResult<()> {
        debug!(screen = self.name(), "waiting for screen");
        for marker in self.ready_markers() {
            self.session()
                .wait_visible(marker, &format!("{} is displayed", self.name()))
                .await?;
        }
        Ok(())
    }
}

/// Wait for `screen` to become ready, then hand it back
pub async fn arrive<S: Screen>(screen: S) -> CheckResult<S> {
    screen.wait_ready().await?;
    Ok(screen)
}

/// The single screen a step-driven scenario currently holds
#[derive(Debug, Default)]
pub enum ActiveScreen {
    /// Nothing opened yet
    #[default]
    None,
    /// Home
    Home(HomeScreen),
    /// Product details
    Product(ProductDetailsScreen),
    /// Cart
    Cart(CartScreen),
    /// Order modal
    Order(OrderModal),
    /// Contact modal
    Contact(ContactModal),
}

impl ActiveScreen {
    /// Name of the held screen
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Home(s) => s.name(),
            Self::Product(s) => s.name(),
            Self::Cart(s) => s.name(),
            Self::Order(s) => s.name(),
            Self::Contact(s) => s.name(),
        }
    }

    /// Whether a screen is held
    #[must_use]
    pub const fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}
