use super::product;
use crate::world::StoreWorld;
use blazecheck::prelude::*;
use cucumber::{given, then, when};

#[given("I am on the home page")]
async fn on_home_page(world: &mut StoreWorld) {
    let home = HomeScreen::new(world.session());
    let result = world
        .seq
        .given("I am on the home page", home.open())
        .await
        .map(drop);
    world.check(result);
    world.screen = ActiveScreen::Home(home);
}

#[then("I should see the navigation bar with all elements")]
async fn navigation_bar(world: &mut StoreWorld) {
    let home = world.home();
    let result = world
        .seq
        .then("the navigation bar is complete", home.verify_navigation_elements())
        .await
        .map(drop);
    world.check(result);
}

#[then("I should see the product carousel")]
async fn carousel(world: &mut StoreWorld) {
    let home = world.home();
    let result = world
        .seq
        .then("the carousel is shown", home.verify_carousel_elements())
        .await
        .map(drop);
    world.check(result);
}

#[then("I should see the categories section")]
async fn categories(world: &mut StoreWorld) {
    let home = world.home();
    let result = world
        .seq
        .then("the categories are listed", home.verify_categories_section())
        .await
        .map(drop);
    world.check(result);
}

#[then("I should see the product pager")]
async fn pager(world: &mut StoreWorld) {
    let home = world.home();
    let result = world
        .seq
        .then("the pager buttons are shown", home.verify_products_navigation_buttons())
        .await
        .map(drop);
    world.check(result);
}

#[then("I should see the footer section")]
async fn footer(world: &mut StoreWorld) {
    let home = world.home();
    let result = world
        .seq
        .then("the footer is complete", home.verify_footer_elements())
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^I should see "([^"]*)" listed for "([^"]*)"$"#)]
async fn product_listed(world: &mut StoreWorld, name: String, price: String) {
    let home = world.home();
    let listed = product(&name);
    assert_eq!(listed.list_price, price, "catalog price for {name}");
    let result = world
        .seq
        .then(
            format!("\"{name}\" is listed for {price}"),
            home.verify_product_listing(listed),
        )
        .await
        .map(drop);
    world.check(result);
}

#[when(regex = r#"^I click on "([^"]*)" product$"#)]
async fn click_product(world: &mut StoreWorld, name: String) {
    let home = world.home();
    let result = world
        .seq
        .when(
            format!("I click on \"{name}\" product"),
            home.click_product(&name),
        )
        .await;
    let details = world.check(result);
    world.screen = ActiveScreen::Product(details);
}

#[then("I should see the product image")]
async fn product_image(world: &mut StoreWorld) {
    let details = world.product();
    let result = world
        .seq
        .then("the product image is shown", details.verify_product_image())
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^I should see product "([^"]*)" priced "([^"]*)"$"#)]
async fn product_details(world: &mut StoreWorld, name: String, price: String) {
    let details = world.product();
    let result = world
        .seq
        .then(
            format!("the details show \"{name}\" at \"{price}\""),
            details.verify_product_details(&name, &price),
        )
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^the description should start with "([^"]*)"$"#)]
async fn description(world: &mut StoreWorld, fragment: String) {
    let details = world.product();
    let result = world
        .seq
        .then(
            format!("the description contains \"{fragment}\""),
            details.verify_description(&fragment),
        )
        .await
        .map(drop);
    world.check(result);
}

#[when("I navigate back to the home page")]
async fn back_home(world: &mut StoreWorld) {
    let result = match &world.screen {
        ActiveScreen::Product(details) => {
            let details = details.clone();
            world
                .seq
                .when("I navigate back to the home page", details.click_home())
                .await
        }
        ActiveScreen::Cart(cart) => {
            let cart = cart.clone();
            world
                .seq
                .when("I navigate back to the home page", cart.navigate_to_home())
                .await
        }
        other => panic!("no way home from {}", other.name()),
    };
    let home = world.check(result);
    world.screen = ActiveScreen::Home(home);
}
