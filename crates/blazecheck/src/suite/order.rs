//! Checkout scenarios.

use super::{add_to_cart, ScenarioCase, Suite};
use crate::catalog::{alerts, OrderDetails, SAMSUNG_GALAXY_S6};
use crate::dialog::AlertExpectation;
use crate::result::CheckResult;
use crate::screen::{HomeScreen, OrderModal, Screen};
use crate::sequencer::Sequencer;
use crate::session::Session;
use futures::FutureExt;

/// Cases of the order suite
#[must_use]
pub fn cases() -> Vec<ScenarioCase> {
    vec![
        ScenarioCase::new(
            "order.place_valid",
            "Place an order with valid details",
            Suite::Order,
            &["smoke"],
            |s, q| place(s, q, OrderDetails::valid()).boxed(),
        ),
        ScenarioCase::new(
            "order.place_invalid",
            "Place an order with invalid details",
            Suite::Order,
            &["negative"],
            |s, q| place(s, q, OrderDetails::invalid()).boxed(),
        ),
        ScenarioCase::new(
            "order.close_form",
            "Close the order form",
            Suite::Order,
            &[],
            |s, q| close_form(s, q).boxed(),
        ),
        ScenarioCase::new(
            "order.empty_form",
            "Purchase with an empty order form",
            Suite::Order,
            &["negative"],
            |s, q| empty_form(s, q).boxed(),
        ),
    ]
}

/// Home, add Samsung galaxy s6, cart, Place Order
async fn open_order_form(session: Session, seq: &mut Sequencer) -> CheckResult<OrderModal> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let home = add_to_cart(seq, &home, &SAMSUNG_GALAXY_S6).await?;
    let cart = seq
        .when("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.and(
        "\"Samsung galaxy s6\" is in the cart",
        cart.verify_product_in_cart(SAMSUNG_GALAXY_S6.name),
    )
    .await?;
    let order = seq
        .and("I click on \"Place Order\" button", cart.click_place_order())
        .await?;
    seq.then("the order form is shown", order.verify_order_form_visible())
        .await?;
    Ok(order)
}

async fn place(session: Session, mut seq: Sequencer, details: OrderDetails) -> CheckResult<()> {
    let order = open_order_form(session, &mut seq).await?;
    seq.and(
        "the order total is 360",
        order.verify_total(SAMSUNG_GALAXY_S6.amount()),
    )
    .await?;
    seq.when("I fill the order form", order.fill_order_details(&details))
        .await?;
    seq.and("I click on \"Purchase\" button", order.click_purchase())
        .await?;
    seq.then(
        "\"Thank you for your purchase!\" is shown",
        order.verify_purchase_confirmed(),
    )
    .await?;
    seq.and(
        "the receipt repeats card and name",
        order.verify_confirmation_details(&details),
    )
    .await?;
    let home = seq
        .when("I confirm the purchase", order.confirm_purchase())
        .await?;
    let cart = seq
        .and("I click on \"Cart\" link", home.click_cart_link())
        .await?;
    seq.then("the cart is empty", cart.verify_empty()).await?;
    Ok(())
}

async fn close_form(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let order = open_order_form(session, &mut seq).await?;
    let cart = seq
        .when("I close the order form", order.click_close())
        .await?;
    seq.then(
        "\"Samsung galaxy s6\" is still in the cart",
        cart.verify_product_in_cart(SAMSUNG_GALAXY_S6.name),
    )
    .await?;
    Ok(())
}

async fn empty_form(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let order = open_order_form(session, &mut seq).await?;
    seq.when("I click on \"Purchase\" button", order.click_purchase())
        .await?;
    seq.then_alert(
        order.session(),
        AlertExpectation::exact(alerts::FILL_OUT_ORDER),
    )
    .await?;
    seq.and("the order form stays open", order.verify_order_form_visible())
        .await?;
    Ok(())
}
