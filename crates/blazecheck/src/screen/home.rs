//! Home screen: navigation bar, carousel, categories, product grid, footer.

use super::{arrive, CartScreen, ContactModal, NavLocators, ProductDetailsScreen, Screen};
use crate::catalog::Product;
use crate::locator::{Locator, LocatorTemplate, Strategy, TextMatch};
use crate::result::{CheckError, CheckResult};
use crate::session::Session;
use tracing::info;

/// Product card title link, by exact product name
pub const PRODUCT_LINK: LocatorTemplate =
    LocatorTemplate::new(Strategy::LinkText, "{}", "Product link");

/// Product card price, e.g. `$360`
pub const PRODUCT_PRICE: LocatorTemplate =
    LocatorTemplate::new(Strategy::XPath, "//h5[text()='{}']", "Product price");

/// Product card description, by leading fragment
pub const PRODUCT_DESCRIPTION: LocatorTemplate = LocatorTemplate::new(
    Strategy::XPath,
    "//p[contains(text(), '{}')]",
    "Product description",
);

/// Locators of the home screen body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLocators {
    /// CATEGORIES heading
    pub categories: Locator,
    /// Phones category
    pub phones: Locator,
    /// Laptops category
    pub laptops: Locator,
    /// Monitors category
    pub monitors: Locator,
    /// Carousel previous arrow
    pub carousel_prev: Locator,
    /// Carousel next arrow
    pub carousel_next: Locator,
    /// Product grid previous page
    pub page_prev: Locator,
    /// Product grid next page
    pub page_next: Locator,
    /// Footer copyright line
    pub copyright: Locator,
    /// Footer "About Us" heading
    pub about_us_heading: Locator,
    /// Footer "Get in Touch" heading
    pub get_in_touch_heading: Locator,
}

impl Default for HomeLocators {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeLocators {
    /// The store's home page
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: Locator::css("#cat", "Categories heading"),
            phones: Locator::link_text("Phones", "Phones category"),
            laptops: Locator::link_text("Laptops", "Laptops category"),
            monitors: Locator::link_text("Monitors", "Monitors category"),
            carousel_prev: Locator::css(".carousel-control-prev", "Carousel previous"),
            carousel_next: Locator::css(".carousel-control-next", "Carousel next"),
            page_prev: Locator::css("#prev2", "Previous page button"),
            page_next: Locator::css("#next2", "Next page button"),
            copyright: Locator::xpath(
                "//p[contains(text(), 'Copyright © Product Store')]",
                "Copyright notice",
            ),
            about_us_heading: Locator::css(
                "div[class='col-sm-4 col-lg-4 col-md-4'] b",
                "About Us heading",
            ),
            get_in_touch_heading: Locator::css(
                "div[class='col-sm-3 col-lg-3 col-md-3'] b",
                "Get in Touch heading",
            ),
        }
    }
}

/// The landing page of the store
#[derive(Debug, Clone)]
pub struct HomeScreen {
    session: Session,
    nav: NavLocators,
    locators: HomeLocators,
}

#[async_trait::async_trait]
impl Screen for HomeScreen {
    fn name(&self) -> &'static str {
        "Home"
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn ready_markers(&self) -> Vec<&Locator> {
        vec![&self.nav.brand, &self.locators.categories]
    }
}

impl HomeScreen {
    /// Bind a home screen to a session without navigating
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            nav: NavLocators::new(),
            locators: HomeLocators::new(),
        }
    }

    /// Navigation bar locators
    #[must_use]
    pub const fn nav(&self) -> &NavLocators {
        &self.nav
    }

    /// Body locators
    #[must_use]
    pub const fn locators(&self) -> &HomeLocators {
        &self.locators
    }

    /// Load the configured entry URL and wait for the page to be ready
    pub async fn open(&self) -> CheckResult<&Self> {
        let url = self.session.config().base_url.clone();
        info!(url = %url, "Opening home page");
        self.session.open(&url).await?;
        self.session
            .wait_visible(&self.nav.brand, "home page ready")
            .await
            .map_err(|e| match e {
                CheckError::Assertion { .. } => {
                    CheckError::navigation(url.as_str(), format!("home page not ready: {e}"))
                }
                other => other,
            })?;
        Ok(self)
    }

    /// Brand, Home, Contact, About us, Cart, Log in, Sign up
    pub async fn verify_navigation_elements(&self) -> CheckResult<&Self> {
        self.nav.verify(&self.session).await?;
        Ok(self)
    }

    /// Carousel arrows
    pub async fn verify_carousel_elements(&self) -> CheckResult<&Self> {
        info!("Verifying carousel elements");
        self.session
            .wait_visible(&self.locators.carousel_prev, "carousel previous arrow")
            .await?;
        self.session
            .wait_visible(&self.locators.carousel_next, "carousel next arrow")
            .await?;
        Ok(self)
    }

    /// CATEGORIES heading and the three category links
    pub async fn verify_categories_section(&self) -> CheckResult<&Self> {
        info!("Verifying categories section");
        let l = &self.locators;
        self.session
            .wait_text(&l.categories, &TextMatch::exact("CATEGORIES"), "categories heading")
            .await?;
        for (locator, label) in [(&l.phones, "Phones"), (&l.laptops, "Laptops"), (&l.monitors, "Monitors")] {
            self.session
                .wait_text(locator, &TextMatch::exact(label), &format!("category '{label}'"))
                .await?;
        }
        Ok(self)
    }

    /// Previous and Next buttons under the product grid
    pub async fn verify_products_navigation_buttons(&self) -> CheckResult<&Self> {
        info!("Verifying products navigation buttons");
        self.session
            .wait_text(&self.locators.page_prev, &TextMatch::exact("Previous"), "previous page button")
            .await?;
        self.session
            .wait_text(&self.locators.page_next, &TextMatch::exact("Next"), "next page button")
            .await?;
        Ok(self)
    }

    /// Copyright line and the two footer headings
    pub async fn verify_footer_elements(&self) -> CheckResult<&Self> {
        info!("Verifying footer elements");
        let l = &self.locators;
        self.session
            .wait_text(
                &l.copyright,
                &TextMatch::exact("Copyright © Product Store 2017"),
                "copyright notice",
            )
            .await?;
        self.session
            .wait_text(&l.about_us_heading, &TextMatch::exact("About Us"), "footer About Us")
            .await?;
        self.session
            .wait_text(
                &l.get_in_touch_heading,
                &TextMatch::exact("Get in Touch"),
                "footer Get in Touch",
            )
            .await?;
        Ok(self)
    }

    /// A product card shows its name, list price and description
    pub async fn verify_product_listing(&self, product: &Product) -> CheckResult<&Self> {
        info!(product = product.name, "Verifying product listing");
        let aspect = format!("listing for {}", product.name);
        self.session
            .wait_visible(&PRODUCT_LINK.bind(product.name), &aspect)
            .await?;
        self.session
            .wait_visible(&PRODUCT_PRICE.bind(product.list_price), &aspect)
            .await?;
        self.session
            .wait_visible(&PRODUCT_DESCRIPTION.bind(product.description_fragment), &aspect)
            .await?;
        Ok(self)
    }

    /// Open a product's details by its exact name
    pub async fn click_product(&self, name: &str) -> CheckResult<ProductDetailsScreen> {
        info!(product = name, "Clicking product");
        self.session.click(&PRODUCT_LINK.bind(name)).await?;
        arrive(ProductDetailsScreen::new(self.session.clone())).await
    }

    /// Go to the cart
    pub async fn click_cart_link(&self) -> CheckResult<CartScreen> {
        info!("Clicking cart link");
        self.session.click(&self.nav.cart).await?;
        arrive(CartScreen::new(self.session.clone())).await
    }

    /// Open the contact modal
    pub async fn click_contact_link(&self) -> CheckResult<ContactModal> {
        info!("Clicking contact link");
        self.session.click(&self.nav.contact).await?;
        arrive(ContactModal::new(self.session.clone())).await
    }

    /// Click Home in the navigation bar
    pub async fn click_home_link(&self) -> CheckResult<&Self> {
        info!("Clicking home link");
        self.session.click(&self.nav.home).await?;
        self.wait_ready().await?;
        Ok(self)
    }
}
