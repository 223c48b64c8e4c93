use super::fields;
use crate::world::StoreWorld;
use blazecheck::prelude::*;
use cucumber::gherkin::Step;
use cucumber::{then, when};

#[when("I click the place order button")]
async fn place_order(world: &mut StoreWorld) {
    let cart = world.cart();
    let result = world
        .seq
        .when("I click on \"Place Order\" button", cart.click_place_order())
        .await;
    let order = world.check(result);
    world.screen = ActiveScreen::Order(order);
}

#[then("I should see the order form")]
async fn order_form(world: &mut StoreWorld) {
    let order = world.order();
    let result = world
        .seq
        .then("the order form is shown", order.verify_order_form_visible())
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^the order total should be (\d+)$"#)]
async fn order_total(world: &mut StoreWorld, amount: u32) {
    let order = world.order();
    let result = world
        .seq
        .then(format!("the order total is {amount}"), order.verify_total(amount))
        .await
        .map(drop);
    world.check(result);
}

#[when("I fill the order details:")]
async fn fill_details(world: &mut StoreWorld, step: &Step) {
    let values = fields(step);
    let get = |key: &str| values.get(key).cloned().unwrap_or_default();
    let details = OrderDetails {
        name: get("name"),
        country: get("country"),
        city: get("city"),
        card: get("card"),
        month: get("month"),
        year: get("year"),
    };
    let order = world.order();
    let result = world
        .seq
        .when("I fill the order form", order.fill_order_details(&details))
        .await
        .map(drop);
    world.check(result);
    world.order_details = Some(details);
}

#[when("I click the purchase button")]
async fn purchase(world: &mut StoreWorld) {
    let order = world.order();
    let result = world
        .seq
        .when("I click on \"Purchase\" button", order.click_purchase())
        .await
        .map(drop);
    world.check(result);
}

#[then("I should see the purchase confirmation")]
async fn confirmation(world: &mut StoreWorld) {
    let order = world.order();
    let result = world
        .seq
        .then(
            "\"Thank you for your purchase!\" is shown",
            order.verify_purchase_confirmed(),
        )
        .await
        .map(drop);
    world.check(result);
}

#[then("the receipt should repeat my card and name")]
async fn receipt(world: &mut StoreWorld) {
    let order = world.order();
    let details = world
        .order_details
        .clone()
        .unwrap_or_else(|| panic!("no order details were filled"));
    let result = world
        .seq
        .then(
            "the receipt repeats card and name",
            order.verify_confirmation_details(&details),
        )
        .await
        .map(drop);
    world.check(result);
}

#[when("I confirm the purchase")]
async fn confirm(world: &mut StoreWorld) {
    let order = world.order();
    let result = world
        .seq
        .when("I confirm the purchase", order.confirm_purchase())
        .await;
    let home = world.check(result);
    world.screen = ActiveScreen::Home(home);
}

#[when("I close the order form")]
async fn close(world: &mut StoreWorld) {
    let order = world.order();
    let result = world
        .seq
        .when("I close the order form", order.click_close())
        .await;
    let cart = world.check(result);
    world.screen = ActiveScreen::Cart(cart);
}
