use super::product;
use crate::world::StoreWorld;
use blazecheck::prelude::*;
use cucumber::{given, then, when};

async fn add_from_home(world: &mut StoreWorld, name: &str) {
    let home = world.home();
    let result = world
        .seq
        .when(format!("I open \"{name}\""), home.click_product(name))
        .await;
    let details = world.check(result);
    let result = world
        .seq
        .and("I click \"Add to cart\"", details.click_add_to_cart())
        .await
        .map(drop);
    world.check(result);
    let session = world.session();
    let result = world
        .seq
        .then_alert(&session, AlertExpectation::containing(alerts::PRODUCT_ADDED))
        .await;
    world.check(result);
    let result = world.seq.and("I go back home", details.click_home()).await;
    let home = world.check(result);
    world.screen = ActiveScreen::Home(home);
}

#[given(regex = r#"^I have "([^"]*)" in my cart$"#)]
async fn have_in_cart(world: &mut StoreWorld, name: String) {
    add_from_home(world, &name).await;
}

#[when(regex = r#"^I add "([^"]*)" to the cart$"#)]
async fn add_to_cart(world: &mut StoreWorld, name: String) {
    add_from_home(world, &name).await;
}

#[when("I click the add to cart button")]
async fn click_add_to_cart(world: &mut StoreWorld) {
    let details = world.product();
    let result = world
        .seq
        .when("I click \"Add to cart\"", details.click_add_to_cart())
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^I should see a success alert "([^"]*)"$"#)]
async fn success_alert(world: &mut StoreWorld, text: String) {
    let session = world.session();
    let result = world
        .seq
        .then_alert(&session, AlertExpectation::containing(text))
        .await;
    world.check(result);
}

#[when("I navigate to the cart page")]
async fn open_cart(world: &mut StoreWorld) {
    let result = match &world.screen {
        ActiveScreen::Home(home) => {
            let home = home.clone();
            world
                .seq
                .when("I click on \"Cart\" link", home.click_cart_link())
                .await
        }
        ActiveScreen::Product(details) => {
            let details = details.clone();
            world
                .seq
                .when("I click on \"Cart\" link", details.click_cart_link())
                .await
        }
        other => panic!("no cart link on {}", other.name()),
    };
    let cart = world.check(result);
    world.screen = ActiveScreen::Cart(cart);
}

#[then(regex = r#"^I should see "([^"]*)" in the cart$"#)]
async fn in_cart(world: &mut StoreWorld, name: String) {
    let cart = world.cart();
    let result = world
        .seq
        .then(
            format!("\"{name}\" is in the cart"),
            cart.verify_product_in_cart(&name),
        )
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^"([^"]*)" should not be in the cart$"#)]
async fn not_in_cart(world: &mut StoreWorld, name: String) {
    let cart = world.cart();
    let result = world
        .seq
        .then(
            format!("\"{name}\" is not in the cart"),
            cart.verify_product_not_in_cart(&name),
        )
        .await
        .map(drop);
    world.check(result);
}

async fn verify_total(world: &mut StoreWorld, amount: u32) {
    let cart = world.cart();
    let result = world
        .seq
        .then(format!("the cart total is {amount}"), cart.verify_total(amount))
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^the cart total should cover "([^"]*)" and "([^"]*)"$"#)]
async fn cart_total_of(world: &mut StoreWorld, first: String, second: String) {
    let amount = product(&first).amount() + product(&second).amount();
    verify_total(world, amount).await;
}

#[then(regex = r#"^the cart total should be (\d+)$"#)]
async fn cart_total(world: &mut StoreWorld, amount: u32) {
    verify_total(world, amount).await;
}

#[when("I delete the first product")]
async fn delete_first(world: &mut StoreWorld) {
    let cart = world.cart();
    let result = world
        .seq
        .when("I delete the first product", cart.click_first_delete())
        .await
        .map(drop);
    world.check(result);
}

#[when(regex = r#"^I remove "([^"]*)" from the cart$"#)]
async fn remove(world: &mut StoreWorld, name: String) {
    let cart = world.cart();
    let result = world
        .seq
        .when(format!("I remove \"{name}\""), cart.click_delete(&name))
        .await
        .map(drop);
    world.check(result);
}

#[then("I should see an empty cart")]
async fn empty_cart(world: &mut StoreWorld) {
    let cart = world.cart();
    let result = world
        .seq
        .then("the cart is empty", cart.verify_empty())
        .await
        .map(drop);
    world.check(result);
}
