//! In-memory monitor state
//!
//! Lives for the lifetime of the process and is owned by the engine. Nothing
//! here is persisted: a restart forgets which products were already alerted.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// What a single observation meant for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockTransition {
    /// Detected in stock and not yet alerted for this streak
    NewlyInStock,
    /// Still in stock, alert already sent
    StillInStock,
    /// Not detected; any previous streak is over
    OutOfStock,
}

impl StockTransition {
    pub fn is_in_stock(self) -> bool {
        !matches!(self, StockTransition::OutOfStock)
    }
}

/// Last observed status of one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductStatus {
    pub url: String,
    pub in_stock: bool,
}

#[derive(Debug, Default)]
pub struct MonitorState {
    notified: HashSet<String>,
    statuses: Vec<ProductStatus>,
    last_report_date: Option<NaiveDate>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of checking `url` and classify the edge.
    ///
    /// A product enters the notified set on its first in-stock observation
    /// and leaves it as soon as it is seen out of stock, so a later restock
    /// alerts again.
    pub fn record_observation(&mut self, url: &str, in_stock: bool) -> StockTransition {
        match self.statuses.iter_mut().find(|s| s.url == url) {
            Some(status) => status.in_stock = in_stock,
            None => self.statuses.push(ProductStatus {
                url: url.to_string(),
                in_stock,
            }),
        }

        if !in_stock {
            self.notified.remove(url);
            StockTransition::OutOfStock
        } else if self.notified.insert(url.to_string()) {
            StockTransition::NewlyInStock
        } else {
            StockTransition::StillInStock
        }
    }

    pub fn is_notified(&self, url: &str) -> bool {
        self.notified.contains(url)
    }

    pub fn stock_status(&self, url: &str) -> Option<bool> {
        self.statuses
            .iter()
            .find(|s| s.url == url)
            .map(|s| s.in_stock)
    }

    /// Statuses in the order products were first observed
    pub fn statuses(&self) -> &[ProductStatus] {
        &self.statuses
    }

    pub fn last_report_date(&self) -> Option<NaiveDate> {
        self.last_report_date
    }

    /// True once the local hour reaches `report_hour` on a date with no report yet
    pub fn daily_report_due(&self, local_now: NaiveDateTime, report_hour: u32) -> bool {
        local_now.hour() >= report_hour && self.last_report_date != Some(local_now.date())
    }

    pub fn mark_reported(&mut self, date: NaiveDate) {
        self.last_report_date = Some(date);
    }
}
