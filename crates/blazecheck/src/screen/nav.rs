//! Navigation bar shared by every page of the store.

use crate::locator::{Locator, TextMatch};
use crate::result::CheckResult;
use crate::session::Session;
use tracing::info;

/// Locators of the top navigation bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLocators {
    /// "PRODUCT STORE" brand link
    pub brand: Locator,
    /// Home link
    pub home: Locator,
    /// Contact link, opens the contact modal
    pub contact: Locator,
    /// About us link
    pub about: Locator,
    /// Cart link
    pub cart: Locator,
    /// Log in link
    pub log_in: Locator,
    /// Sign up link
    pub sign_up: Locator,
}

impl Default for NavLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl NavLocators {
    /// The store's navigation bar
    #[must_use]
    pub fn new() -> Self {
        Self {
            brand: Locator::link_text("PRODUCT STORE", "Brand link"),
            home: Locator::css(
                "li[class='nav-item active'] a[class='nav-link']",
                "Home link",
            ),
            contact: Locator::css("a[data-target='#exampleModal']", "Contact link"),
            about: Locator::css("a[data-target='#videoModal']", "About us link"),
            cart: Locator::css("#cartur", "Cart link"),
            log_in: Locator::css("#login2", "Log in link"),
            sign_up: Locator::css("#signin2", "Sign up link"),
        }
    }

    /// Each nav entry with its visible label
    #[must_use]
    pub fn labelled(&self) -> [(&Locator, &'static str); 7] {
        [
            (&self.brand, "PRODUCT STORE"),
            (&self.home, "Home"),
            (&self.contact, "Contact"),
            (&self.about, "About us"),
            (&self.cart, "Cart"),
            (&self.log_in, "Log in"),
            (&self.sign_up, "Sign up"),
        ]
    }

    /// Check every entry is visible and carries its label
    pub async fn verify(&self, session: &Session) -> CheckResult<()> {
        info!("Verifying navigation elements");
        for (locator, label) in self.labelled() {
            session
                .wait_text(
                    locator,
                    &TextMatch::contains(label),
                    &format!("navigation shows '{label}'"),
                )
                .await?;
        }
        Ok(())
    }
}
