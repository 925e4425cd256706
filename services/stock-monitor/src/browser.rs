//! Headless Chrome page source
//!
//! The in-stock marker is written into the page by client-side scripts, so a
//! plain HTTP GET is not enough: pages are rendered in a real browser driven
//! over the DevTools protocol.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::fetcher::{PageSession, PageSource, STORE_COOKIE_NAME};
use crate::StockMonitorError;

fn browser_error(context: &str, e: impl std::fmt::Display) -> StockMonitorError {
    StockMonitorError::Browser(format!("{}: {}", context, e))
}

/// Launches a new headless Chrome for every session
#[derive(Debug, Clone)]
pub struct ChromePageSource {
    retailer_url: String,
    cookie_domain: String,
}

impl ChromePageSource {
    pub fn new(config: &Config) -> Self {
        Self {
            retailer_url: config.retailer_url.to_string(),
            cookie_domain: config.cookie_domain(),
        }
    }
}

#[async_trait]
impl PageSource for ChromePageSource {
    async fn open(&self) -> crate::Result<Box<dyn PageSession>> {
        let browser_config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(|e| browser_error("Invalid browser configuration", e))?;

        tracing::debug!("Launching headless Chrome");
        let (browser, mut events) = Browser::launch(browser_config)
            .await
            .map_err(|e| browser_error("Failed to launch Chrome", e))?;

        // The DevTools connection only makes progress while its event stream is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::trace!("DevTools event error: {}", e);
                }
            }
        });

        Ok(Box::new(ChromeSession {
            browser,
            handler,
            page: None,
            retailer_url: self.retailer_url.clone(),
            cookie_domain: self.cookie_domain.clone(),
        }))
    }
}

/// One running browser process with a single reusable tab
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    retailer_url: String,
    cookie_domain: String,
}

impl ChromeSession {
    async fn page(&mut self) -> crate::Result<Page> {
        if let Some(page) = &self.page {
            return Ok(page.clone());
        }
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| browser_error("Failed to open tab", e))?;
        self.page = Some(page.clone());
        Ok(page)
    }
}

/// Store selection cookie, visible to every subdomain of the retailer
fn store_cookie(domain: &str, store_id: &str) -> crate::Result<CookieParam> {
    CookieParam::builder()
        .name(STORE_COOKIE_NAME)
        .value(store_id)
        .domain(domain)
        .path("/")
        .secure(true)
        .http_only(false)
        .build()
        .map_err(|e| browser_error("Invalid store cookie", e))
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn fetch(&mut self, product_url: &str, store_id: &str) -> crate::Result<String> {
        let page = self.page().await?;

        // The cookie can only be set once the tab is on the retailer's domain
        tracing::debug!("Loading {}", self.retailer_url);
        page.goto(self.retailer_url.as_str())
            .await
            .map_err(|e| browser_error(&format!("Failed to load {}", self.retailer_url), e))?;

        page.set_cookie(store_cookie(&self.cookie_domain, store_id)?)
            .await
            .map_err(|e| browser_error("Failed to set store cookie", e))?;

        tracing::debug!("Loading {}", product_url);
        page.goto(product_url)
            .await
            .map_err(|e| browser_error(&format!("Failed to load {}", product_url), e))?;

        let html = page
            .content()
            .await
            .map_err(|e| browser_error(&format!("Failed to read {}", product_url), e))?;
        tracing::debug!("Fetched {} ({} bytes)", product_url, html.len());
        Ok(html)
    }

    async fn close(mut self: Box<Self>) -> crate::Result<()> {
        tracing::debug!("Closing headless Chrome");
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for Chrome to exit failed: {}", e);
        }
        closed
            .map(|_| ())
            .map_err(|e| browser_error("Failed to close Chrome", e))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
