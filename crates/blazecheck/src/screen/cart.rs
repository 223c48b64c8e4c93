//! Cart screen.

use super::{arrive, HomeScreen, NavLocators, OrderModal, Screen};
use crate::locator::{Locator, LocatorTemplate, Strategy, TextMatch};
use crate::result::{CheckError, CheckResult};
use crate::session::Session;
use tracing::info;

/// Title cell of a cart row, by product name
pub const PRODUCT_CELL: LocatorTemplate = LocatorTemplate::new(
    Strategy::XPath,
    "//td[normalize-space()='{}']",
    "Cart cell",
);

/// Price cell of a cart row, e.g. `360`
pub const PRICE_CELL: LocatorTemplate =
    LocatorTemplate::new(Strategy::XPath, "//td[text()='{}']", "Cart price cell");

/// Delete link in the row holding a product
pub const DELETE_BY_PRODUCT: LocatorTemplate = LocatorTemplate::new(
    Strategy::XPath,
    "//tr[td[normalize-space()='{}']]//a[text()='Delete']",
    "Delete link for",
);

/// Delete link by 1-based row position
pub const DELETE_AT: LocatorTemplate = LocatorTemplate::new(
    Strategy::XPath,
    "(//a[text()='Delete'])[{}]",
    "Delete link at row",
);

/// Locators of the cart screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLocators {
    /// "Products" heading
    pub products_heading: Locator,
    /// "Total" heading
    pub total_heading: Locator,
    /// Pic column header
    pub pic_header: Locator,
    /// Title column header
    pub title_header: Locator,
    /// Price column header
    pub price_header: Locator,
    /// Delete column header
    pub delete_header: Locator,
    /// Total amount
    pub total_amount: Locator,
    /// Place Order button
    pub place_order: Locator,
}

impl Default for CartLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl CartLocators {
    /// The store's cart page
    #[must_use]
    pub fn new() -> Self {
        Self {
            products_heading: Locator::xpath("//h2[text()='Products']", "Products heading"),
            total_heading: Locator::css("div[class='col-lg-1'] h2", "Total heading"),
            pic_header: Locator::xpath("//th[text()='Pic']", "Pic column"),
            title_header: Locator::xpath("//th[text()='Title']", "Title column"),
            price_header: Locator::xpath("//th[text()='Price']", "Price column"),
            delete_header: Locator::xpath("//th[text()='x']", "Delete column"),
            total_amount: Locator::css("#totalp", "Cart total"),
            place_order: Locator::xpath("//button[text()='Place Order']", "Place Order button"),
        }
    }
}

/// The shopping cart
#[derive(Debug, Clone)]
pub struct CartScreen {
    session: Session,
    nav: NavLocators,
    locators: CartLocators,
}

#[async_trait::async_trait]
impl Screen for CartScreen {
    fn name(&self) -> &'static str {
        "Cart"
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn ready_markers(&self) -> Vec<&Locator> {
        vec![&self.locators.products_heading, &self.locators.place_order]
    }
}

impl CartScreen {
    /// Bind to a session; use a `click_cart_link` to get a ready one
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            nav: NavLocators::new(),
            locators: CartLocators::new(),
        }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &CartLocators {
        &self.locators
    }

    /// Headings and table column headers
    pub async fn verify_cart_headers(&self) -> CheckResult<&Self> {
        info!("Verifying cart headers");
        let l = &self.locators;
        self.session
            .wait_visible(&l.products_heading, "cart Products heading")
            .await?;
        self.session
            .wait_text(&l.total_heading, &TextMatch::exact("Total"), "cart Total heading")
            .await?;
        for header in [&l.pic_header, &l.title_header, &l.price_header, &l.delete_header] {
            self.session
                .wait_visible(header, &format!("cart column {}", header.description()))
                .await?;
        }
        Ok(self)
    }

    /// A row for `name` is listed
    pub async fn verify_product_in_cart(&self, name: &str) -> CheckResult<&Self> {
        info!(product = name, "Verifying product in cart");
        self.session
            .wait_visible(&PRODUCT_CELL.bind(name), &format!("cart contains {name}"))
            .await?;
        Ok(self)
    }

    /// No row for `name` is listed
    pub async fn verify_product_not_in_cart(&self, name: &str) -> CheckResult<&Self> {
        info!(product = name, "Verifying product not in cart");
        self.session
            .wait_hidden(&PRODUCT_CELL.bind(name), &format!("cart does not contain {name}"))
            .await?;
        Ok(self)
    }

    /// A row shows the price `price` (digits only, as the cart renders it)
    pub async fn verify_price_listed(&self, price: &str) -> CheckResult<&Self> {
        info!(price, "Verifying price in cart");
        self.session
            .wait_visible(&PRICE_CELL.bind(price), &format!("cart lists price {price}"))
            .await?;
        Ok(self)
    }

    /// The cart total reads `amount`
    pub async fn verify_total(&self, amount: u32) -> CheckResult<&Self> {
        info!(amount, "Verifying cart total");
        self.session
            .wait_text(
                &self.locators.total_amount,
                &TextMatch::exact(amount.to_string()),
                "cart total",
            )
            .await?;
        Ok(self)
    }

    /// No rows and an empty total
    pub async fn verify_empty(&self) -> CheckResult<&Self> {
        info!("Verifying cart is empty");
        self.session
            .wait_visible(&self.locators.title_header, "cart table")
            .await?;
        let first_row = DELETE_AT.bind(1);
        self.session
            .wait_hidden(&first_row, "cart has no rows")
            .await?;
        // rows load after the table header; an empty table must stay empty
        self.session
            .hold_hidden(&first_row, "cart has no rows")
            .await?;
        let total = self.session.element(&self.locators.total_amount).await?;
        match total {
            Some(state) if !state.text.trim().is_empty() => Err(CheckError::assertion(
                "cart total is empty",
                format!("Expected no total but got '{}'", state.text.trim()),
            )),
            _ => Ok(self),
        }
    }

    /// Delete the row holding `name`
    pub async fn click_delete(&self, name: &str) -> CheckResult<&Self> {
        info!(product = name, "Deleting product from cart");
        self.session.click(&DELETE_BY_PRODUCT.bind(name)).await?;
        Ok(self)
    }

    /// Delete the first row
    pub async fn click_first_delete(&self) -> CheckResult<&Self> {
        self.click_delete_at(1).await
    }

    /// Delete the row at 1-based `index`
    pub async fn click_delete_at(&self, index: usize) -> CheckResult<&Self> {
        if index == 0 {
            return Err(CheckError::invalid_state("cart rows are numbered from 1"));
        }
        info!(index, "Deleting cart row");
        self.session.click(&DELETE_AT.bind(index)).await?;
        Ok(self)
    }

    /// Open the order form
    pub async fn click_place_order(&self) -> CheckResult<OrderModal> {
        info!("Clicking place order");
        self.session.click(&self.locators.place_order).await?;
        arrive(OrderModal::new(self.session.clone())).await
    }

    /// Back to the home screen
    pub async fn navigate_to_home(&self) -> CheckResult<HomeScreen> {
        info!("Navigating to home");
        self.session.click(&self.nav.home).await?;
        arrive(HomeScreen::new(self.session.clone())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_templates() {
        assert_eq!(
            DELETE_BY_PRODUCT.bind("Nexus 6").selector().value(),
            "//tr[td[normalize-space()='Nexus 6']]//a[text()='Delete']"
        );
        assert_eq!(DELETE_AT.bind(1).selector().value(), "(//a[text()='Delete'])[1]");
    }

    #[test]
    fn test_product_cell_template() {
        assert_eq!(
            PRODUCT_CELL.bind("Samsung galaxy s6").selector().value(),
            "//td[normalize-space()='Samsung galaxy s6']"
        );
    }
}
