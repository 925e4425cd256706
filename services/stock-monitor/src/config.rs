//! Configuration for the stock monitor
//!
//! All settings come from environment variables and are resolved exactly once
//! at startup into an immutable [`Config`].

use std::time::Duration;

use chrono_tz::Tz;
use url::Url;

use crate::StockMonitorError;

pub const DEFAULT_STORE_ID: &str = "051";
pub const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 300;
pub const DEFAULT_IN_STOCK_INTERVAL_SECONDS: u64 = 3600;
pub const DEFAULT_DAILY_REPORT_HOUR: u32 = 9;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
pub const DEFAULT_RETAILER_URL: &str = "https://www.microcenter.com";
pub const DEFAULT_STOCK_MARKER: &str = "'inStock':'True'";

/// Gotify endpoint and application token
#[derive(Clone, PartialEq, Eq)]
pub struct GotifyConfig {
    pub url: String,
    pub token: String,
}

impl std::fmt::Debug for GotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GotifyConfig")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub product_urls: Vec<String>,
    pub store_id: String,
    pub check_interval_seconds: u64,
    pub in_stock_interval_seconds: u64,
    pub daily_report_hour: u32,
    pub timezone: Tz,
    pub retailer_url: Url,
    pub stock_marker: String,
    pub exit_on_stock: bool,
    /// `None` disables notifications
    pub gotify: Option<GotifyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            product_urls: Vec::new(),
            store_id: DEFAULT_STORE_ID.to_string(),
            check_interval_seconds: DEFAULT_CHECK_INTERVAL_SECONDS,
            in_stock_interval_seconds: DEFAULT_IN_STOCK_INTERVAL_SECONDS,
            daily_report_hour: DEFAULT_DAILY_REPORT_HOUR,
            timezone: DEFAULT_TIMEZONE,
            retailer_url: default_retailer_url(),
            stock_marker: DEFAULT_STOCK_MARKER.to_string(),
            exit_on_stock: false,
            gotify: None,
        }
    }
}

impl Config {
    /// Resolve the configuration from the process environment
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset. `PRODUCT_URLS` is the only
    /// required key; every other key falls back to its default.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let product_urls = parse_product_urls(&get("PRODUCT_URLS").unwrap_or_default());
        if product_urls.is_empty() {
            return Err(StockMonitorError::Config(
                "No PRODUCT_URLS configured in environment".to_string(),
            ));
        }

        let mut config = Config {
            product_urls,
            ..Config::default()
        };

        if let Some(store_id) = get("STORE_ID") {
            config.store_id = store_id;
        }
        if let Some(raw) = get("CHECK_INTERVAL") {
            config.check_interval_seconds = parse_seconds("CHECK_INTERVAL", &raw)?;
        }
        if let Some(raw) = get("IN_STOCK_INTERVAL") {
            config.in_stock_interval_seconds = parse_seconds("IN_STOCK_INTERVAL", &raw)?;
        }
        if let Some(raw) = get("DAILY_REPORT_HOUR") {
            config.daily_report_hour = parse_hour("DAILY_REPORT_HOUR", &raw)?;
        }
        if let Some(raw) = get("TIMEZONE") {
            config.timezone = raw.parse::<Tz>().map_err(|_| {
                StockMonitorError::Config(format!("TIMEZONE: unknown time zone '{}'", raw))
            })?;
        }
        if let Some(raw) = get("RETAILER_URL") {
            config.retailer_url = Url::parse(&raw).map_err(|e| {
                StockMonitorError::Config(format!("RETAILER_URL: invalid URL '{}': {}", raw, e))
            })?;
            if config.retailer_url.host_str().is_none() {
                return Err(StockMonitorError::Config(format!(
                    "RETAILER_URL: '{}' has no host",
                    raw
                )));
            }
        }
        if let Some(marker) = get("STOCK_MARKER") {
            config.stock_marker = marker;
        }
        if let Some(raw) = get("EXIT_ON_STOCK") {
            config.exit_on_stock = parse_bool("EXIT_ON_STOCK", &raw)?;
        }

        config.gotify = match (get("GOTIFY_URL"), get("GOTIFY_TOKEN")) {
            (Some(url), Some(token)) => Some(GotifyConfig {
                url: url.trim_end_matches('/').to_string(),
                token,
            }),
            _ => None,
        };

        Ok(config)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    pub fn in_stock_interval(&self) -> Duration {
        Duration::from_secs(self.in_stock_interval_seconds)
    }

    /// Domain scope for the store-selection cookie, e.g. `.microcenter.com`
    pub fn cookie_domain(&self) -> String {
        let host = self.retailer_url.host_str().unwrap_or_default();
        format!(".{}", host.strip_prefix("www.").unwrap_or(host))
    }
}

/// Split a comma-separated URL list, trimming and dropping empty entries
pub fn parse_product_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_retailer_url() -> Url {
    Url::parse(DEFAULT_RETAILER_URL).expect("default retailer URL is valid")
}

fn parse_seconds(key: &str, raw: &str) -> crate::Result<u64> {
    raw.parse::<u64>().map_err(|_| {
        StockMonitorError::Config(format!(
            "{}: expected a whole number of seconds, got '{}'",
            key, raw
        ))
    })
}

fn parse_hour(key: &str, raw: &str) -> crate::Result<u32> {
    match raw.parse::<u32>() {
        Ok(hour) if hour <= 23 => Ok(hour),
        _ => Err(StockMonitorError::Config(format!(
            "{}: expected an hour between 0 and 23, got '{}'",
            key, raw
        ))),
    }
}

fn parse_bool(key: &str, raw: &str) -> crate::Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StockMonitorError::Config(format!(
            "{}: expected true or false, got '{}'",
            key, raw
        ))),
    }
}
