//! Contact modal scenarios.

use super::{ScenarioCase, Suite};
use crate::catalog::{alerts, ContactMessage};
use crate::dialog::AlertExpectation;
use crate::result::CheckResult;
use crate::screen::{HomeScreen, Screen};
use crate::sequencer::Sequencer;
use crate::session::Session;
use futures::FutureExt;

/// Cases of the contact suite
#[must_use]
pub fn cases() -> Vec<ScenarioCase> {
    vec![
        ScenarioCase::new(
            "contact.send_valid",
            "Send a valid contact message",
            Suite::Contact,
            &["smoke"],
            |s, q| send(s, q, ContactMessage::valid(), alerts::MESSAGE_SENT).boxed(),
        ),
        ScenarioCase::new(
            "contact.send_empty",
            "Send an empty contact message",
            Suite::Contact,
            &["smoke", "negative"],
            |s, q| send(s, q, ContactMessage::empty(), alerts::FILL_OUT_EMAIL).boxed(),
        ),
        ScenarioCase::new(
            "contact.send_invalid",
            "Send a contact message with invalid data",
            Suite::Contact,
            &["negative"],
            |s, q| send(s, q, ContactMessage::invalid(), alerts::MESSAGE_SENT).boxed(),
        ),
        ScenarioCase::new(
            "contact.close",
            "Close the contact modal",
            Suite::Contact,
            &[],
            |s, q| close(s, q).boxed(),
        ),
    ]
}

async fn send(
    session: Session,
    mut seq: Sequencer,
    message: ContactMessage,
    expected_alert: &'static str,
) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let contact = seq
        .when("I click on \"Contact\" link", home.click_contact_link())
        .await?;
    seq.then(
        "the contact modal is shown",
        contact.verify_contact_modal_visible(),
    )
    .await?;
    seq.and("the form fields are shown", contact.verify_form_fields())
        .await?;
    seq.when("I fill the contact form", contact.fill_contact_form(&message))
        .await?;
    seq.and("I click on \"Send message\" button", contact.click_send_message())
        .await?;
    seq.then_alert(contact.session(), AlertExpectation::exact(expected_alert))
        .await?;
    Ok(())
}

async fn close(session: Session, mut seq: Sequencer) -> CheckResult<()> {
    let home = HomeScreen::new(session);
    seq.given("I am on the home page", home.open()).await?;
    let contact = seq
        .when("I click on \"Contact\" link", home.click_contact_link())
        .await?;
    seq.then(
        "the contact modal is shown",
        contact.verify_contact_modal_visible(),
    )
    .await?;
    let home = seq
        .when("I close the contact modal", contact.click_close())
        .await?;
    seq.then(
        "the navigation bar is usable again",
        home.verify_navigation_elements(),
    )
    .await?;
    Ok(())
}
