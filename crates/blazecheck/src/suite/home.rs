//! Home page, navigation bar and product details.

use super::{ScenarioCase, Suite};
use crate::catalog::{Product, NEXUS_6, NOKIA_LUMIA_1520, PRODUCTS, SAMSUNG_GALAXY_S6};
use crate::result::CheckResult;
use crate::screen::HomeScreen;
use crate::sequencer::Sequencer;
use crate::session::Session;
use futures::FutureExt;

/// Cases of the home suite
#[must_use]
pub fn cases() -> Vec<ScenarioCase> {
    vec![
        ScenarioCase::new(
            "home.basic_elements",
            "Home page shows its basic elements",
            Suite::Home,
            &["smoke"],
            |s, q| basic_elements(s, q).boxed(),
        ),
        ScenarioCase::new(
            "home.navigation",
            "Navigation bar links reach their screens",
            Suite::Home,
            &[],
            |s, q| navigation(s, q).boxed(),
        ),
        ScenarioCase::new(
            "home.product_listing",
            "Home page lists the catalog products",
            Suite::Home,
            &[],
            |s, q| product_listing(s, q).boxed(),
        ),
        ScenarioCase::new(
            "home.samsung_s6_details",
            "Samsung galaxy s6 details",
            Suite::Home,
            &["smoke", "product"],
            |s, q| product_details(s, q, &SAMSUNG_GALAXY_S6).boxed(),
        ),
        ScenarioCase::new(
            "home.nokia_lumia_details",
            "Nokia lumia 1520 details",
            Suite::Home,
            &["product"],
            |s, q| product_details(s, q, &NOKIA_LUMIA_1520).boxed(),
        ),
        ScenarioCase::new(
            "home.nexus_6_details",
            "Nexus 6 details",
            Suite::Home,
            &["product"],
            |s, q| product_details(s, q, &NEXUS_6).boxed(),
        ),
    ]
}

async fn basic_elements(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    seq.then("the navigation bar is complete", home.verify_navigation_elements())
        .await?;
    seq.and("the carousel arrows are shown", home.verify_carousel_elements())
        .await?;
    seq.and("the categories are listed", home.verify_categories_section())
        .await?;
    seq.and(
        "the product pager buttons are shown",
        home.verify_products_navigation_buttons(),
    )
    .await?;
    seq.and("the footer is complete", home.verify_footer_elements())
        .await?;
    Ok(())
}

async fn navigation(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.then("the cart headers are shown", cart.verify_cart_headers())
        .await?;
    let home = seq
        .when("I click on \"Home\" link", cart.navigate_to_home())
        .await?;
    let contact = seq
        .and("I click on \"Contact\" link", home.click_contact_link())
        .await?;
    seq.then(
        "the contact modal is shown",
        contact.verify_contact_modal_visible(),
    )
    .await?;
    let home = seq
        .when("I close the contact modal", contact.click_close())
        .await?;
    seq.then("the home page is shown again", home.click_home_link())
        .await?;
    Ok(())
}

async fn product_listing(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    for product in &PRODUCTS {
        seq.then(
            format!("\"{}\" is listed at {}", product.name, product.list_price),
            home.verify_product_listing(product),
        )
        .await?;
    }
    Ok(())
}

async fn product_details(
    session: Session,
    mut seq: Sequencer,
    product: &'static Product,
) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let details = seq
        .when(
            format!("I click on \"{}\" product", product.name),
            home.click_product(product.name),
        )
        .await?;
    seq.then("the product image is shown", details.verify_product_image())
        .await?;
    seq.and(
        format!("the price reads \"{}\"", product.price_with_tax),
        details.verify_product_details(product.name, product.price_with_tax),
    )
    .await?;
    seq.and(
        format!("the description contains \"{}\"", product.description_fragment),
        details.verify_description(product.description_fragment),
    )
    .await?;
    Ok(())
}
