//! BDD test world for the stock monitor

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cucumber::World;

use stock_monitor::detector::MarkerDetector;
use stock_monitor::fetcher::{PageSession, PageSource};
use stock_monitor::io::{HttpClient, HttpResponse};
use stock_monitor::notifier::{Notification, Notifier};
use stock_monitor::{Config, CycleOutcome, Engine, StockMonitorError, StopReason};

pub const IN_STOCK_PAGE: &str =
    "<html><script>dataLayer.push({'inStock':'True'});</script></html>";
pub const OUT_OF_STOCK_PAGE: &str =
    "<html><script>dataLayer.push({'inStock':'False'});</script></html>";

/// Build a product URL from a slug, e.g. `widget-a`
pub fn product_url(slug: &str) -> String {
    format!("https://www.microcenter.com/product/100/{}", slug)
}

/// A fake retailer whose stock can change between cycles
#[derive(Debug, Default)]
pub struct FakeShop {
    pub in_stock: Mutex<HashMap<String, bool>>,
    pub failing: Mutex<Option<String>>,
    pub opened: Mutex<u32>,
    pub closed: Mutex<u32>,
}

/// Page source handing out sessions backed by a [`FakeShop`]
#[derive(Debug, Clone)]
pub struct FakePages(pub Arc<FakeShop>);

struct FakeSession(Arc<FakeShop>);

#[async_trait]
impl PageSource for FakePages {
    async fn open(&self) -> stock_monitor::Result<Box<dyn PageSession>> {
        *self.0.opened.lock().unwrap() += 1;
        Ok(Box::new(FakeSession(Arc::clone(&self.0))))
    }
}

#[async_trait]
impl PageSession for FakeSession {
    async fn fetch(&mut self, product_url: &str, _store_id: &str) -> stock_monitor::Result<String> {
        if self.0.failing.lock().unwrap().as_deref() == Some(product_url) {
            return Err(StockMonitorError::Browser(format!(
                "Failed to load {}: net::ERR_TIMED_OUT",
                product_url
            )));
        }
        let in_stock = self
            .0
            .in_stock
            .lock()
            .unwrap()
            .get(product_url)
            .copied()
            .unwrap_or(false);
        Ok(if in_stock {
            IN_STOCK_PAGE
        } else {
            OUT_OF_STOCK_PAGE
        }
        .to_string())
    }

    async fn close(self: Box<Self>) -> stock_monitor::Result<()> {
        *self.0.closed.lock().unwrap() += 1;
        Ok(())
    }
}

/// A test notifier that records notifications
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, notification: &Notification) -> stock_monitor::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// A recorded HTTP request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub body: serde_json::Value,
}

/// An HTTP client that records all requests and answers with a fixed status
#[derive(Debug)]
pub struct RecordingHttpClient {
    pub status: u16,
    pub unreachable: bool,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl Default for RecordingHttpClient {
    fn default() -> Self {
        Self {
            status: 200,
            unreachable: false,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> stock_monitor::Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            body: body.clone(),
        });
        if self.unreachable {
            return Err(StockMonitorError::Http("connection refused".to_string()));
        }
        Ok(HttpResponse {
            status: self.status,
            body: "{}".to_string(),
        })
    }
}

#[derive(Debug, Default, World)]
pub struct StockMonitorWorld {
    // Configuration
    pub env: HashMap<String, String>,
    pub config_result: Option<stock_monitor::Result<Config>>,

    // Detection
    pub detector: Option<MarkerDetector>,
    pub detection_result: Option<bool>,

    // Notification
    pub notifier: Option<Box<dyn Notifier>>,
    pub notification_result: Option<stock_monitor::Result<()>>,
    pub http: Option<Arc<RecordingHttpClient>>,

    // Monitoring
    pub shop: Arc<FakeShop>,
    pub recorder: Arc<RecordingNotifier>,
    pub product_urls: Vec<String>,
    pub exit_on_stock: bool,
    pub daily_report_hour: Option<u32>,
    pub engine: Option<Engine>,
    pub last_outcome: Option<CycleOutcome>,
    pub last_error: Option<StockMonitorError>,
    pub stop_reason: Option<StopReason>,
}

impl StockMonitorWorld {
    pub fn test_config(&self) -> Config {
        let defaults = Config::default();
        Config {
            product_urls: self.product_urls.clone(),
            exit_on_stock: self.exit_on_stock,
            daily_report_hour: self
                .daily_report_hour
                .unwrap_or(defaults.daily_report_hour),
            ..defaults
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.recorder.sent.lock().unwrap().clone()
    }

    /// Lazily build the engine so Given steps can keep adjusting the setup
    pub fn engine(&mut self) -> &mut Engine {
        if self.engine.is_none() {
            let engine = Engine::new(
                self.test_config(),
                Arc::new(FakePages(Arc::clone(&self.shop))),
                Arc::new(MarkerDetector::default()),
                Arc::clone(&self.recorder) as Arc<dyn Notifier>,
                tokio_util::sync::CancellationToken::new(),
            );
            self.engine = Some(engine);
        }
        self.engine.as_mut().expect("engine was just built")
    }
}
