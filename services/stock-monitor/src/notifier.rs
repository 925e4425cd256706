//! Notifier trait for sending alerts

use async_trait::async_trait;
use serde::Serialize;

/// Priority used for every message the monitor sends
pub const DEFAULT_PRIORITY: i8 = 8;

/// A notification to be sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub priority: i8,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            priority: DEFAULT_PRIORITY,
        }
    }
}

/// Trait for sending notifications
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "gotify")
    fn type_name(&self) -> &str;

    /// Send a notification
    async fn notify(&self, notification: &Notification) -> crate::Result<()>;
}

/// Stand-in used when no push service is configured
#[derive(Debug, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    fn type_name(&self) -> &str {
        "disabled"
    }

    async fn notify(&self, notification: &Notification) -> crate::Result<()> {
        tracing::info!(
            "Gotify not configured, skipping notification '{}'",
            notification.title
        );
        Ok(())
    }
}
