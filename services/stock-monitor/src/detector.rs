//! Stock detection strategies
//!
//! The monitor only needs a yes/no answer from rendered page markup. The
//! default strategy is a literal substring search for the marker the
//! retailer's client-side scripts emit; anything smarter can be plugged in
//! through [`StockDetector`] without touching the engine.

use crate::config::DEFAULT_STOCK_MARKER;

/// Decides whether rendered page markup reports the item as in stock
pub trait StockDetector: Send + Sync + std::fmt::Debug {
    fn detect(&self, html: &str) -> bool;
}

/// Exact, case-sensitive substring match against a fixed marker
#[derive(Debug, Clone)]
pub struct MarkerDetector {
    marker: String,
}

impl MarkerDetector {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for MarkerDetector {
    fn default() -> Self {
        Self::new(DEFAULT_STOCK_MARKER)
    }
}

impl StockDetector for MarkerDetector {
    fn detect(&self, html: &str) -> bool {
        html.contains(&self.marker)
    }
}
