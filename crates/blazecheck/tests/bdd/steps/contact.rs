use super::fields;
use crate::world::StoreWorld;
use blazecheck::prelude::*;
use cucumber::gherkin::Step;
use cucumber::{then, when};

#[when("I open the contact modal")]
async fn open_contact(world: &mut StoreWorld) {
    let home = world.home();
    let result = world
        .seq
        .when("I click on \"Contact\" link", home.click_contact_link())
        .await;
    let contact = world.check(result);
    world.screen = ActiveScreen::Contact(contact);
}

#[then("the contact modal should be displayed")]
async fn modal_displayed(world: &mut StoreWorld) {
    let contact = world.contact();
    let result = world
        .seq
        .then("the contact modal is shown", contact.verify_contact_modal_visible())
        .await
        .map(drop);
    world.check(result);
}

#[then("I should see the contact form fields")]
async fn form_fields(world: &mut StoreWorld) {
    let contact = world.contact();
    let result = world
        .seq
        .then("the contact form fields are shown", contact.verify_form_fields())
        .await
        .map(drop);
    world.check(result);
}

#[when("I fill the contact form with:")]
async fn fill_form(world: &mut StoreWorld, step: &Step) {
    let values = fields(step);
    let get = |key: &str| values.get(key).cloned().unwrap_or_default();
    let message = ContactMessage {
        email: get("email"),
        name: get("name"),
        message: get("message"),
    };
    let contact = world.contact();
    let result = world
        .seq
        .when("I fill the contact form", contact.fill_contact_form(&message))
        .await
        .map(drop);
    world.check(result);
}

#[when("I send the message")]
async fn send(world: &mut StoreWorld) {
    let contact = world.contact();
    let result = world
        .seq
        .when("I click on \"Send message\" button", contact.click_send_message())
        .await
        .map(drop);
    world.check(result);
}

#[then(regex = r#"^I should see the alert "([^"]*)"$"#)]
async fn exact_alert(world: &mut StoreWorld, text: String) {
    let session = world.session();
    let result = world
        .seq
        .then_alert(&session, AlertExpectation::exact(text))
        .await;
    world.check(result);
}

#[when("I close the contact modal")]
async fn close(world: &mut StoreWorld) {
    let contact = world.contact();
    let result = world
        .seq
        .when("I close the contact modal", contact.click_close())
        .await;
    let home = world.check(result);
    world.screen = ActiveScreen::Home(home);
}

#[then("the contact modal should be hidden")]
async fn modal_hidden(world: &mut StoreWorld) {
    let contact = ContactModal::new(world.session());
    let result = world
        .seq
        .then("the contact modal is hidden", contact.verify_closed())
        .await
        .map(drop);
    world.check(result);
}
