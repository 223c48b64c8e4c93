//! Place-order modal and the purchase confirmation shown over it.

use super::{arrive, CartScreen, HomeScreen, Screen};
use crate::catalog::{alerts, OrderDetails};
use crate::locator::{Locator, TextMatch};
use crate::result::CheckResult;
use crate::session::Session;
use tracing::info;

/// Locators of the order modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLocators {
    /// Modal title
    pub title: Locator,
    /// Total line inside the form
    pub total: Locator,
    /// Name input
    pub name: Locator,
    /// Country input
    pub country: Locator,
    /// City input
    pub city: Locator,
    /// Credit card input
    pub card: Locator,
    /// Month input
    pub month: Locator,
    /// Year input
    pub year: Locator,
    /// Purchase button
    pub purchase: Locator,
    /// Close button
    pub close: Locator,
    /// "Thank you for your purchase!" heading
    pub confirmation_heading: Locator,
    /// Receipt text under the heading
    pub confirmation_details: Locator,
    /// OK button of the confirmation
    pub confirm: Locator,
}

impl Default for OrderLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderLocators {
    /// The store's order modal
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: Locator::css("#orderModalLabel", "Order modal title"),
            total: Locator::css("#totalm", "Order total"),
            name: Locator::id("name", "Name field"),
            country: Locator::id("country", "Country field"),
            city: Locator::id("city", "City field"),
            card: Locator::id("card", "Credit card field"),
            month: Locator::id("month", "Month field"),
            year: Locator::id("year", "Year field"),
            purchase: Locator::xpath("//button[text()='Purchase']", "Purchase button"),
            close: Locator::xpath(
                "//div[@id='orderModal']//button[@type='button'][normalize-space()='Close']",
                "Order close button",
            ),
            confirmation_heading: Locator::xpath(
                "//h2[text()='Thank you for your purchase!']",
                "Purchase confirmation",
            ),
            confirmation_details: Locator::css(".lead.text-muted", "Purchase receipt"),
            confirm: Locator::css(".confirm.btn.btn-lg.btn-primary", "Confirmation OK button"),
        }
    }

    /// The six form inputs in form order
    #[must_use]
    pub fn fields(&self) -> [&Locator; 6] {
        [&self.name, &self.country, &self.city, &self.card, &self.month, &self.year]
    }
}

/// The checkout form opened from the cart
#[derive(Debug, Clone)]
pub struct OrderModal {
    session: Session,
    locators: OrderLocators,
}

#[async_trait::async_trait]
impl Screen for OrderModal {
    fn name(&self) -> &'static str {
        "Order modal"
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn ready_markers(&self) -> Vec<&Locator> {
        vec![&self.locators.name, &self.locators.purchase]
    }
}

impl OrderModal {
    /// Bind to a session; use [`CartScreen::click_place_order`] to get a ready one
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            locators: OrderLocators::new(),
        }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &OrderLocators {
        &self.locators
    }

    async fn fill(&self, locator: &Locator, value: &str) -> CheckResult<&Self> {
        info!(field = locator.description(), value, "Filling order field");
        self.session.fill(locator, value).await?;
        Ok(self)
    }

    /// Type the customer name
    pub async fn fill_name(&self, name: &str) -> CheckResult<&Self> {
        self.fill(&self.locators.name, name).await
    }

    /// Type the country
    pub async fn fill_country(&self, country: &str) -> CheckResult<&Self> {
        self.fill(&self.locators.country, country).await
    }

    /// Type the city
    pub async fn fill_city(&self, city: &str) -> CheckResult<&Self> {
        self.fill(&self.locators.city, city).await
    }

    /// Type the credit card number
    pub async fn fill_credit_card(&self, card: &str) -> CheckResult<&Self> {
        self.fill(&self.locators.card, card).await
    }

    /// Type the expiry month
    pub async fn fill_month(&self, month: &str) -> CheckResult<&Self> {
        self.fill(&self.locators.month, month).await
    }

    /// Type the expiry year
    pub async fn fill_year(&self, year: &str) -> CheckResult<&Self> {
        self.fill(&self.locators.year, year).await
    }

    /// Fill all six fields
    pub async fn fill_order_details(&self, details: &OrderDetails) -> CheckResult<&Self> {
        info!(name = %details.name, "Filling order details");
        self.fill_name(&details.name).await?;
        self.fill_country(&details.country).await?;
        self.fill_city(&details.city).await?;
        self.fill_credit_card(&details.card).await?;
        self.fill_month(&details.month).await?;
        self.fill_year(&details.year).await?;
        Ok(self)
    }

    /// Click Purchase. With an empty name or card the store answers with a
    /// native dialog instead of the confirmation.
    pub async fn click_purchase(&self) -> CheckResult<&Self> {
        info!("Clicking purchase");
        self.session.click(&self.locators.purchase).await?;
        Ok(self)
    }

    /// Every form field and the Purchase button are shown
    pub async fn verify_order_form_visible(&self) -> CheckResult<&Self> {
        info!("Verifying order form");
        for field in self.locators.fields() {
            self.session
                .wait_visible(field, &format!("order form {}", field.description()))
                .await?;
        }
        self.session
            .wait_visible(&self.locators.purchase, "order form Purchase button")
            .await?;
        Ok(self)
    }

    /// The form shows `Total: <amount>`
    pub async fn verify_total(&self, amount: u32) -> CheckResult<&Self> {
        self.session
            .wait_text(
                &self.locators.total,
                &TextMatch::exact(format!("Total: {amount}")),
                "order total",
            )
            .await?;
        Ok(self)
    }

    /// The "Thank you for your purchase!" confirmation is shown
    pub async fn verify_purchase_confirmed(&self) -> CheckResult<&Self> {
        info!("Verifying purchase confirmation");
        self.session
            .wait_text(
                &self.locators.confirmation_heading,
                &TextMatch::exact(alerts::PURCHASE_THANK_YOU),
                "order success message",
            )
            .await?;
        Ok(self)
    }

    /// The receipt repeats the card number and customer name
    pub async fn verify_confirmation_details(&self, details: &OrderDetails) -> CheckResult<&Self> {
        info!("Verifying purchase receipt");
        let receipt = &self.locators.confirmation_details;
        self.session
            .wait_text(
                receipt,
                &TextMatch::contains(format!("Card Number: {}", details.card)),
                "receipt card number",
            )
            .await?;
        self.session
            .wait_text(
                receipt,
                &TextMatch::contains(format!("Name: {}", details.name)),
                "receipt customer name",
            )
            .await?;
        Ok(self)
    }

    /// Click OK on the confirmation; the store returns to the home page
    pub async fn confirm_purchase(&self) -> CheckResult<HomeScreen> {
        info!("Confirming purchase");
        self.session.click(&self.locators.confirm).await?;
        arrive(HomeScreen::new(self.session.clone())).await
    }

    /// Close the form, back to the cart
    pub async fn click_close(&self) -> CheckResult<CartScreen> {
        info!("Closing order form");
        self.session.click(&self.locators.close).await?;
        self.session
            .wait_hidden(&self.locators.purchase, "order form closed")
            .await?;
        arrive(CartScreen::new(self.session.clone())).await
    }
}
