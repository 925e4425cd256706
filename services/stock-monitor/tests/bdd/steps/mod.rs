//! BDD step definitions for the stock monitor

pub mod config_steps;
