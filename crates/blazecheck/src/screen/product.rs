//! Product details screen.

use super::{arrive, CartScreen, HomeScreen, NavLocators, Screen};
use crate::locator::{Locator, TextMatch};
use crate::result::CheckResult;
use crate::session::Session;
use tracing::info;

/// Locators of the product details screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLocators {
    /// Product image
    pub image: Locator,
    /// Name heading
    pub name: Locator,
    /// Price with tax note
    pub price: Locator,
    /// Description paragraph
    pub description: Locator,
    /// Add to cart button
    pub add_to_cart: Locator,
}

impl Default for ProductLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductLocators {
    /// The store's product page
    #[must_use]
    pub fn new() -> Self {
        Self {
            image: Locator::css("#imgp img", "Product image"),
            name: Locator::css(".name", "Product name heading"),
            price: Locator::css(".price-container", "Product price"),
            description: Locator::css("#more-information p", "Product description"),
            add_to_cart: Locator::link_text("Add to cart", "Add to cart button"),
        }
    }
}

/// Details of one product, reached from the home grid
#[derive(Debug, Clone)]
pub struct ProductDetailsScreen {
    session: Session,
    nav: NavLocators,
    locators: ProductLocators,
}

#[async_trait::async_trait]
impl Screen for ProductDetailsScreen {
    fn name(&self) -> &'static str {
        "Product details"
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn ready_markers(&self) -> Vec<&Locator> {
        vec![&self.locators.name, &self.locators.add_to_cart]
    }
}

impl ProductDetailsScreen {
    /// Bind to a session; use [`HomeScreen::click_product`] to get a ready one
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            nav: NavLocators::new(),
            locators: ProductLocators::new(),
        }
    }

    /// Locators
    #[must_use]
    pub const fn locators(&self) -> &ProductLocators {
        &self.locators
    }

    /// The product image is shown
    pub async fn verify_product_image(&self) -> CheckResult<&Self> {
        info!("Verifying product image");
        self.session
            .wait_visible(&self.locators.image, "product image")
            .await?;
        Ok(self)
    }

    /// Name heading equals `name` and the price reads `price_with_tax`
    pub async fn verify_product_details(&self, name: &str, price_with_tax: &str) -> CheckResult<&Self> {
        info!(product = name, price = price_with_tax, "Verifying product details");
        self.session
            .wait_text(&self.locators.name, &TextMatch::exact(name), "product name")
            .await?;
        self.session
            .wait_text(
                &self.locators.price,
                &TextMatch::contains(price_with_tax),
                "product price",
            )
            .await?;
        self.session
            .wait_visible(&self.locators.add_to_cart, "add to cart button")
            .await?;
        Ok(self)
    }

    /// The description contains `fragment`
    pub async fn verify_description(&self, fragment: &str) -> CheckResult<&Self> {
        info!(fragment, "Verifying product description");
        self.session
            .wait_text(
                &self.locators.description,
                &TextMatch::contains(fragment),
                "product description",
            )
            .await?;
        Ok(self)
    }

    /// Click "Add to cart". The store answers with a native dialog, which
    /// must be consumed with [`Session::expect_alert`] before anything else.
    pub async fn click_add_to_cart(&self) -> CheckResult<&Self> {
        info!("Clicking add to cart");
        self.session.click(&self.locators.add_to_cart).await?;
        Ok(self)
    }

    /// Back to the home screen
    pub async fn click_home(&self) -> CheckResult<HomeScreen> {
        info!("Clicking home link");
        self.session.click(&self.nav.home).await?;
        arrive(HomeScreen::new(self.session.clone())).await
    }

    /// Go to the cart
    pub async fn click_cart_link(&self) -> CheckResult<CartScreen> {
        info!("Clicking cart link");
        self.session.click(&self.nav.cart).await?;
        arrive(CartScreen::new(self.session.clone())).await
    }
}
