//! Gotify notification client

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::config::GotifyConfig;
use crate::io::HttpClient;
use crate::notifier::{Notification, Notifier};

/// Gotify notification sender
pub struct GotifyNotifier {
    url: String,
    token: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for GotifyNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GotifyNotifier")
            .field("url", &self.url)
            .finish()
    }
}

impl GotifyNotifier {
    pub fn new(config: &GotifyConfig, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created GotifyNotifier for '{}'", config.url);

        Self {
            url: config.url.clone(),
            token: config.token.clone(),
            http,
        }
    }

    /// `{base}/message?token={token}`
    fn message_url(&self) -> crate::Result<String> {
        let endpoint = format!("{}/message", self.url.trim_end_matches('/'));
        let url = Url::parse_with_params(&endpoint, &[("token", self.token.as_str())])
            .map_err(|e| {
                crate::StockMonitorError::Notifier(format!(
                    "Invalid Gotify URL '{}': {}",
                    self.url, e
                ))
            })?;
        Ok(url.into())
    }
}

#[async_trait]
impl Notifier for GotifyNotifier {
    fn type_name(&self) -> &str {
        "gotify"
    }

    async fn notify(&self, notification: &Notification) -> crate::Result<()> {
        let url = self.message_url()?;
        let body = serde_json::to_value(notification)?;

        tracing::debug!(
            "Sending Gotify notification: title='{}', priority={}",
            notification.title,
            notification.priority
        );

        let response = self.http.post_json(&url, &body).await?;

        if !response.is_success() {
            return Err(crate::StockMonitorError::Notifier(format!(
                "Gotify API returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("Gotify notification sent");
        Ok(())
    }
}
