//! BDD step definitions for configuration feature

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use stock_monitor::{Config, StockMonitorError};

use crate::world::StockMonitorWorld;

fn config(world: &StockMonitorWorld) -> &Config {
    world
        .config_result
        .as_ref()
        .expect("configuration was not resolved")
        .as_ref()
        .expect("configuration failed")
}

#[given("an empty environment")]
fn empty_environment(world: &mut StockMonitorWorld) {
    world.env.clear();
}

#[given("the environment:")]
fn environment(world: &mut StockMonitorWorld, step: &Step) {
    let table = step.table.as_ref().expect("environment table missing");
    for row in table.rows.iter().skip(1) {
        world.env.insert(row[0].clone(), row[1].clone());
    }
}

#[when("the configuration is resolved")]
fn resolve_configuration(world: &mut StockMonitorWorld) {
    let env = world.env.clone();
    world.config_result = Some(Config::from_lookup(move |key| env.get(key).cloned()));
}

#[then(expr = "configuration fails mentioning {string}")]
fn configuration_fails(world: &mut StockMonitorWorld, text: String) {
    let result = world.config_result.as_ref().expect("configuration was not resolved");
    match result {
        Err(StockMonitorError::Config(msg)) => assert!(msg.contains(&text), "{msg}"),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}

#[then(expr = "{int} product(s) is/are monitored")]
fn products_monitored(world: &mut StockMonitorWorld, count: usize) {
    assert_eq!(config(world).product_urls.len(), count);
}

#[then(expr = "the store id is {string}")]
fn store_id(world: &mut StockMonitorWorld, expected: String) {
    assert_eq!(config(world).store_id, expected);
}

#[then(expr = "the check interval is {int} seconds")]
fn check_interval(world: &mut StockMonitorWorld, seconds: u64) {
    assert_eq!(config(world).check_interval_seconds, seconds);
}

#[then(expr = "the in-stock interval is {int} seconds")]
fn in_stock_interval(world: &mut StockMonitorWorld, seconds: u64) {
    assert_eq!(config(world).in_stock_interval_seconds, seconds);
}

#[then(expr = "the daily report is due from hour {int} in {string}")]
fn daily_report_settings(world: &mut StockMonitorWorld, hour: u32, zone: String) {
    let config = config(world);
    assert_eq!(config.daily_report_hour, hour);
    assert_eq!(config.timezone.name(), zone);
}

#[then("notifications are disabled in the configuration")]
fn gotify_disabled(world: &mut StockMonitorWorld) {
    assert!(config(world).gotify.is_none());
}

#[then(expr = "notifications go to {string}")]
fn gotify_enabled(world: &mut StockMonitorWorld, url: String) {
    let gotify = config(world).gotify.as_ref().expect("gotify not configured");
    assert_eq!(gotify.url, url);
}
