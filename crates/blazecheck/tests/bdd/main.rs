//! Gherkin scenarios for the store, run against the simulated storefront.
//!
//! ```text
//! tests/features/home.feature     -> home page and product details
//! tests/features/cart.feature     -> add, delete, persistence
//! tests/features/contact.feature  -> contact modal and its alerts
//! tests/features/order.feature    -> checkout
//! ```
//!
//! Each scenario acquires its own session in the before hook; the after hook
//! captures artifacts on failure and releases the session.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod steps;
mod world;

use cucumber::writer::Stats as _;
use cucumber::World;
use futures::FutureExt;
use tracing_subscriber::EnvFilter;
use world::{StepOutcome, StoreWorld};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("blazecheck=warn".parse().unwrap()),
        )
        .with_test_writer()
        .init();

    let writer = StoreWorld::cucumber()
        .fail_on_skipped()
        .before(|_feature, _rule, scenario, world| {
            async move { world.start(&scenario.name).await }.boxed_local()
        })
        .after(|_feature, _rule, _scenario, event, world| {
            let outcome = StepOutcome::from_event(event);
            async move {
                if let Some(world) = world {
                    world.conclude(outcome).await;
                }
            }
            .boxed_local()
        })
        .run("tests/features")
        .await;

    let reporter = world::reporter();
    println!("{}", reporter.summary());
    if writer.execution_has_failed() || !reporter.all_passed() {
        std::process::exit(1);
    }
}
