//! Stock Monitor - retail product page stock monitor
//!
//! Renders product pages for a selected store, detects the in-stock marker,
//! and sends a Gotify notification the first time each product is seen in
//! stock. An optional daily report summarises every product's status.

pub mod browser;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod gotify;
pub mod io;
pub mod notifier;
pub mod product;
pub mod report;
pub mod state;

pub use config::{Config, GotifyConfig};
pub use engine::{CycleOutcome, Engine, StopReason};
pub use error::{Result, StockMonitorError};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::browser::ChromePageSource;
use crate::detector::{MarkerDetector, StockDetector};
use crate::fetcher::PageSource;
use crate::gotify::GotifyNotifier;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::{DisabledNotifier, Notifier};

/// Builder for the stock monitor.
///
/// Every collaborator defaults to its production implementation and can be
/// swapped out for tests.
pub struct StockMonitorBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    pages: Option<Arc<dyn PageSource>>,
    detector: Option<Arc<dyn StockDetector>>,
    notifier: Option<Arc<dyn Notifier>>,
    cancel: Option<CancellationToken>,
}

impl StockMonitorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            pages: None,
            detector: None,
            notifier: None,
            cancel: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_page_source(mut self, pages: Arc<dyn PageSource>) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_detector(mut self, detector: Arc<dyn StockDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> StockMonitor {
        let config = self.config;

        let pages = self
            .pages
            .unwrap_or_else(|| Arc::new(ChromePageSource::new(&config)));
        let detector = self
            .detector
            .unwrap_or_else(|| Arc::new(MarkerDetector::new(config.stock_marker.clone())));

        let notifier: Arc<dyn Notifier> = match (self.notifier, &config.gotify) {
            (Some(notifier), _) => notifier,
            (None, Some(gotify)) => {
                let http = self
                    .http
                    .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
                Arc::new(GotifyNotifier::new(gotify, http))
            }
            (None, None) => {
                tracing::info!("Gotify not configured, notifications are disabled");
                Arc::new(DisabledNotifier)
            }
        };

        let cancel = self.cancel.unwrap_or_default();
        let engine = Engine::new(config, pages, detector, notifier, cancel.clone());

        StockMonitor { engine, cancel }
    }
}

/// A configured monitor ready to run
pub struct StockMonitor {
    engine: Engine,
    cancel: CancellationToken,
}

impl StockMonitor {
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run until Ctrl-C, until stock is found with `exit_on_stock`, or for a
    /// single cycle when `once` is set.
    pub async fn start(mut self, once: bool) -> Result<StopReason> {
        log_startup(self.engine.config());

        let cancel_for_signal = self.cancel.clone();
        let signal = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
            }
        });

        let result = self.engine.run(once).await;
        signal.abort();

        match &result {
            Ok(reason) => tracing::info!("Stock monitor stopped ({:?})", reason),
            Err(e) => tracing::error!("Stock monitor failed: {}", e),
        }
        result
    }
}

fn log_startup(config: &Config) {
    tracing::info!("Starting stock checker...");
    tracing::info!("Store ID: {}", config.store_id);
    tracing::info!("Check interval: {} seconds", config.check_interval_seconds);
    tracing::info!(
        "In-stock interval: {} seconds",
        config.in_stock_interval_seconds
    );
    tracing::info!(
        "Daily report: {}:00 ({})",
        config.daily_report_hour,
        config.timezone.name()
    );
    if config.exit_on_stock {
        tracing::info!("Exiting as soon as any product is in stock");
    }
    tracing::info!("Monitoring {} product(s)", config.product_urls.len());
    for url in &config.product_urls {
        tracing::info!("  - {}", url);
    }
}
