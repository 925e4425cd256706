//! Page fetching abstraction
//!
//! A [`PageSource`] opens one [`PageSession`] per poll cycle. The session is
//! used for every configured product and released before the engine sleeps,
//! so no browser state survives from one cycle to the next.

use async_trait::async_trait;

/// Name of the cookie that selects the store whose inventory a page shows
pub const STORE_COOKIE_NAME: &str = "storeSelected";

/// Opens fresh fetch sessions
#[async_trait]
pub trait PageSource: Send + Sync + std::fmt::Debug {
    async fn open(&self) -> crate::Result<Box<dyn PageSession>>;
}

/// A live fetch session, e.g. one headless browser process
#[async_trait]
pub trait PageSession: Send {
    /// Return the rendered markup of `product_url` as seen from store `store_id`
    async fn fetch(&mut self, product_url: &str, store_id: &str) -> crate::Result<String>;

    /// Tear the session down
    async fn close(self: Box<Self>) -> crate::Result<()>;
}
