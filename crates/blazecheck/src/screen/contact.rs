//! Contact ("New message") modal.

use super::{arrive, HomeScreen, Screen};
use crate::catalog::ContactMessage;
use crate::locator::{Locator, TextMatch};
use crate::result::CheckResult;
use crate::session::Session;
use tracing::info;

/// Locators of the contact modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLocators {
    /// Modal title
    pub title: Locator,
    /// Contact email input
    pub email: Locator,
    /// Contact name input
    pub name: Locator,
    /// Message textarea
    pub message: Locator,
    /// Send message button
    pub send: Locator,
    /// Close button
    pub close: Locator,
}

impl Default for ContactLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactLocators {
    /// The store's contact modal
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: Locator::css("#exampleModalLabel", "Contact modal title"),
            email: Locator::id("recipient-email", "Contact email field"),
            name: Locator::id("recipient-name", "Contact name field"),
            message: Locator::id("message-text", "Message field"),
            send: Locator::xpath("//button[text()='Send message']", "Send message button"),
            close: Locator::xpath(
                "//div[@id='exampleModal']//button[normalize-space()='Close']",
                "Contact close button",
            ),
        }
    }
}

/// The contact form opened from the navigation bar
#[derive(Debug, Clone)]
pub struct ContactModal {
    session: Session,
    locators: ContactLocators,
}

#[async_trait::async_trait]
impl Screen for ContactModal {
    fn name(&self) -> &'static str {
        "Contact modal"
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn ready_markers(&self) -> Vec<&Locator> {
        vec![&self.locators.title, &self.locators.email]
    }
}

impl ContactModal {
    /// Bind to a session; use [`HomeScreen::click_contact_link`] to get a ready one
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            locators: ContactLocators::new(),
        }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &ContactLocators {
        &self.locators
    }

    /// Type the sender email
    pub async fn fill_contact_email(&self, email: &str) -> CheckResult<&Self> {
        info!(email, "Filling contact email");
        self.session.fill(&self.locators.email, email).await?;
        Ok(self)
    }

    /// Type the sender name
    pub async fn fill_contact_name(&self, name: &str) -> CheckResult<&Self> {
        info!(name, "Filling contact name");
        self.session.fill(&self.locators.name, name).await?;
        Ok(self)
    }

    /// Type the message body
    pub async fn fill_contact_message(&self, message: &str) -> CheckResult<&Self> {
        info!("Filling contact message");
        self.session.fill(&self.locators.message, message).await?;
        Ok(self)
    }

    /// Fill email, name and message
    pub async fn fill_contact_form(&self, message: &ContactMessage) -> CheckResult<&Self> {
        self.fill_contact_email(&message.email).await?;
        self.fill_contact_name(&message.name).await?;
        self.fill_contact_message(&message.message).await?;
        Ok(self)
    }

    /// Click "Send message". The store always answers with a native dialog.
    pub async fn click_send_message(&self) -> CheckResult<&Self> {
        info!("Clicking send message");
        self.session.click(&self.locators.send).await?;
        Ok(self)
    }

    /// Title and Send button are shown
    pub async fn verify_contact_modal_visible(&self) -> CheckResult<&Self> {
        info!("Verifying contact modal");
        self.session
            .wait_text(&self.locators.title, &TextMatch::exact("New message"), "contact modal title")
            .await?;
        self.session
            .wait_visible(&self.locators.send, "contact Send message button")
            .await?;
        Ok(self)
    }

    /// The three inputs are shown
    pub async fn verify_form_fields(&self) -> CheckResult<&Self> {
        info!("Verifying contact form fields");
        let l = &self.locators;
        for field in [&l.email, &l.name, &l.message] {
            self.session
                .wait_visible(field, &format!("contact form {}", field.description()))
                .await?;
        }
        Ok(self)
    }

    /// The modal is no longer shown
    pub async fn verify_closed(&self) -> CheckResult<&Self> {
        self.session
            .wait_hidden(&self.locators.send, "contact modal closed")
            .await?;
        Ok(self)
    }

    /// Close the modal, back to the home screen
    pub async fn click_close(&self) -> CheckResult<HomeScreen> {
        info!("Closing contact modal");
        self.session.click(&self.locators.close).await?;
        self.verify_closed().await?;
        arrive(HomeScreen::new(self.session.clone())).await
    }
}
