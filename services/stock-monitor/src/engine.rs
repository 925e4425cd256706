//! Engine: fetch, detect, notify, sleep

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::detector::StockDetector;
use crate::fetcher::{PageSession, PageSource};
use crate::notifier::{Notification, Notifier};
use crate::product::display_name;
use crate::report;
use crate::state::{MonitorState, StockTransition};

/// Result of checking every configured product once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub any_in_stock: bool,
    /// Products that triggered a stock alert this cycle
    pub alerted: Vec<String>,
}

/// Why the loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Cancelled,
    /// `exit_on_stock` is set and something was in stock
    StockFound,
    /// A single cycle was requested
    SingleCycle,
}

/// The engine owns the monitor state and drives the poll loop
#[derive(Debug)]
pub struct Engine {
    config: Config,
    pages: Arc<dyn PageSource>,
    detector: Arc<dyn StockDetector>,
    notifier: Arc<dyn Notifier>,
    state: MonitorState,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        config: Config,
        pages: Arc<dyn PageSource>,
        detector: Arc<dyn StockDetector>,
        notifier: Arc<dyn Notifier>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            pages,
            detector,
            notifier,
            state: MonitorState::new(),
            cancel,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Poll until cancelled, or until stock is found when `exit_on_stock` is set.
    ///
    /// Fetch failures are not retried: the error is returned after the
    /// browser session has been released, and restarting is left to
    /// whatever supervises the process.
    pub async fn run(&mut self, once: bool) -> crate::Result<StopReason> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(StopReason::Cancelled);
            }

            let outcome = self.run_cycle().await?;

            let now = Utc::now().with_timezone(&self.config.timezone);
            self.send_daily_report_if_due(&now).await;

            if self.config.exit_on_stock && outcome.any_in_stock {
                tracing::info!("Stock found, exiting");
                return Ok(StopReason::StockFound);
            }
            if once {
                return Ok(StopReason::SingleCycle);
            }

            let sleep = self.next_sleep(&outcome);
            tracing::info!("Sleeping {} seconds...", sleep.as_secs());
            tokio::select! {
                _ = tokio::time::sleep(sleep) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    return Ok(StopReason::Cancelled);
                }
            }
        }
    }

    /// Check every product with one page session, releasing it on every path
    pub async fn run_cycle(&mut self) -> crate::Result<CycleOutcome> {
        let mut session = self.pages.open().await?;
        let result = self.check_products(session.as_mut()).await;
        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close page session: {}", e);
        }
        result
    }

    async fn check_products(
        &mut self,
        session: &mut dyn PageSession,
    ) -> crate::Result<CycleOutcome> {
        let mut outcome = CycleOutcome::default();

        for url in &self.config.product_urls {
            let html = session.fetch(url, &self.config.store_id).await?;
            let in_stock = self.detector.detect(&html);
            let transition = self.state.record_observation(url, in_stock);
            let name = display_name(url);

            match transition {
                StockTransition::NewlyInStock => {
                    tracing::info!("In Stock: {} (NEW!)", name);
                    send(self.notifier.as_ref(), &report::stock_alert(url)).await;
                    outcome.alerted.push(url.clone());
                }
                StockTransition::StillInStock => {
                    tracing::info!("In Stock: {} (already notified)", name);
                }
                StockTransition::OutOfStock => {
                    tracing::info!("Out of Stock: {}", name);
                }
            }
            outcome.any_in_stock |= transition.is_in_stock();
        }

        Ok(outcome)
    }

    /// Send the daily report unless it already went out today or the hour has
    /// not come yet. Returns whether a report was sent.
    pub async fn send_daily_report_if_due(&mut self, now: &DateTime<Tz>) -> bool {
        if !self
            .state
            .daily_report_due(now.naive_local(), self.config.daily_report_hour)
        {
            return false;
        }

        tracing::info!("Sending daily status report...");
        let notification = report::daily_report(now, self.state.statuses());
        send(self.notifier.as_ref(), &notification).await;
        self.state.mark_reported(now.date_naive());
        true
    }

    /// Back off to the longer interval while anything is in stock
    pub fn next_sleep(&self, outcome: &CycleOutcome) -> Duration {
        if outcome.any_in_stock {
            self.config.in_stock_interval()
        } else {
            self.config.check_interval()
        }
    }
}

/// Best-effort delivery: failures are logged and never reach the loop
async fn send(notifier: &dyn Notifier, notification: &Notification) {
    match notifier.notify(notification).await {
        Ok(()) => tracing::debug!(
            "Notification '{}' sent via {}",
            notification.title,
            notifier.type_name()
        ),
        Err(e) => tracing::warn!(
            "Failed to send notification '{}' via {}: {}",
            notification.title,
            notifier.type_name(),
            e
        ),
    }
}
