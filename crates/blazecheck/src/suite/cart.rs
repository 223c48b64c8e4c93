//! Cart scenarios.

use super::{add_to_cart, ScenarioCase, Suite};
use crate::catalog::{NEXUS_6, NOKIA_LUMIA_1520, SAMSUNG_GALAXY_S6, SONY_XPERIA_Z5};
use crate::result::CheckResult;
use crate::screen::HomeScreen;
use crate::sequencer::Sequencer;
use crate::session::Session;
use futures::FutureExt;

/// Cases of the cart suite
#[must_use]
pub fn cases() -> Vec<ScenarioCase> {
    vec![
        ScenarioCase::new(
            "cart.add_product",
            "Add Samsung galaxy s6 to the cart",
            Suite::Cart,
            &["smoke"],
            |s, q| add_product(s, q).boxed(),
        ),
        ScenarioCase::new(
            "cart.add_multiple",
            "Add two products to the cart",
            Suite::Cart,
            &[],
            |s, q| add_multiple(s, q).boxed(),
        ),
        ScenarioCase::new(
            "cart.delete_first",
            "Delete the first product from the cart",
            Suite::Cart,
            &["smoke"],
            |s, q| delete_first(s, q).boxed(),
        ),
        ScenarioCase::new(
            "cart.delete_by_name",
            "Delete a product from the cart by name",
            Suite::Cart,
            &[],
            |s, q| delete_by_name(s, q).boxed(),
        ),
        ScenarioCase::new(
            "cart.persists",
            "Cart keeps its products across navigation",
            Suite::Cart,
            &[],
            |s, q| persists(s, q).boxed(),
        ),
        ScenarioCase::new(
            "cart.empty",
            "A fresh session has an empty cart",
            Suite::Cart,
            &[],
            |s, q| empty(s, q).boxed(),
        ),
    ]
}

async fn add_product(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let home = add_to_cart(&mut seq, &home, &SAMSUNG_GALAXY_S6).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.then("the cart headers are shown", cart.verify_cart_headers())
        .await?;
    seq.and(
        "\"Samsung galaxy s6\" is in the cart",
        cart.verify_product_in_cart(SAMSUNG_GALAXY_S6.name),
    )
    .await?;
    seq.and(
        "its price is listed",
        cart.verify_price_listed(SAMSUNG_GALAXY_S6.cart_price()),
    )
    .await?;
    seq.and("the total is 360", cart.verify_total(SAMSUNG_GALAXY_S6.amount()))
        .await?;
    Ok(())
}

async fn add_multiple(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let home = add_to_cart(&mut seq, &home, &SAMSUNG_GALAXY_S6).await?;
    let home = add_to_cart(&mut seq, &home, &NEXUS_6).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.then(
        "\"Samsung galaxy s6\" is in the cart",
        cart.verify_product_in_cart(SAMSUNG_GALAXY_S6.name),
    )
    .await?;
    seq.and(
        "\"Nexus 6\" is in the cart",
        cart.verify_product_in_cart(NEXUS_6.name),
    )
    .await?;
    seq.and(
        "the total is the sum of both prices",
        cart.verify_total(SAMSUNG_GALAXY_S6.amount() + NEXUS_6.amount()),
    )
    .await?;
    Ok(())
}

async fn delete_first(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let home = add_to_cart(&mut seq, &home, &SAMSUNG_GALAXY_S6).await?;
    let home = add_to_cart(&mut seq, &home, &NEXUS_6).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.and("both products are listed", async {
        cart.verify_product_in_cart(SAMSUNG_GALAXY_S6.name).await?;
        cart.verify_product_in_cart(NEXUS_6.name).await
    })
    .await?;
    seq.and("I delete the first product", cart.click_first_delete())
        .await?;
    seq.then(
        "\"Samsung galaxy s6\" is not in the cart",
        cart.verify_product_not_in_cart(SAMSUNG_GALAXY_S6.name),
    )
    .await?;
    seq.and(
        "\"Nexus 6\" is still in the cart",
        cart.verify_product_in_cart(NEXUS_6.name),
    )
    .await?;
    seq.and("the total is 650", cart.verify_total(NEXUS_6.amount()))
        .await?;
    Ok(())
}

async fn delete_by_name(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let home = add_to_cart(&mut seq, &home, &NOKIA_LUMIA_1520).await?;
    let home = add_to_cart(&mut seq, &home, &SONY_XPERIA_Z5).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.and(
        "\"Nokia lumia 1520\" is listed",
        cart.verify_product_in_cart(NOKIA_LUMIA_1520.name),
    )
    .await?;
    seq.and(
        "I delete \"Nokia lumia 1520\"",
        cart.click_delete(NOKIA_LUMIA_1520.name),
    )
    .await?;
    seq.then(
        "\"Nokia lumia 1520\" is not in the cart",
        cart.verify_product_not_in_cart(NOKIA_LUMIA_1520.name),
    )
    .await?;
    seq.and(
        "\"Sony xperia z5\" is still in the cart",
        cart.verify_product_in_cart(SONY_XPERIA_Z5.name),
    )
    .await?;
    Ok(())
}

async fn persists(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let home = add_to_cart(&mut seq, &home, &SAMSUNG_GALAXY_S6).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.and(
        "\"Samsung galaxy s6\" is in the cart",
        cart.verify_product_in_cart(SAMSUNG_GALAXY_S6.name),
    )
    .await?;
    let home = seq
        .when("I go back to the home page", cart.navigate_to_home())
        .await?;
    let cart = seq
        .and("I open the cart again", home.click_cart_link())
        .await?;
    seq.then(
        "\"Samsung galaxy s6\" is still in the cart",
        cart.verify_product_in_cart(SAMSUNG_GALAXY_S6.name),
    )
    .await?;
    Ok(())
}

async fn empty(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.then("the cart headers are shown", cart.verify_cart_headers())
        .await?;
    seq.and("the cart is empty", cart.verify_empty()).await?;
    Ok(())
}
