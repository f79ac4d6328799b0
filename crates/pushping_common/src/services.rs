// --- File: crates/pushping_common/src/services.rs ---
//! Service abstractions for the token store and the push gateway.
//!
//! The endpoint and the scheduler depend on these traits only, so both can be
//! exercised against in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use crate::error::PushPingError;
use crate::models::{TokenRecord, UpsertOutcome};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Persistent set of device tokens.
pub trait TokenStore: Send + Sync {
    /// Insert the token, or refresh `name` and `updated_at` if it already exists.
    ///
    /// An empty token fails with `InvalidInput` before the store is touched.
    fn upsert_token(
        &self,
        token: &str,
        name: Option<&str>,
    ) -> BoxFuture<'_, UpsertOutcome, PushPingError>;

    /// Every stored token, oldest registration first.
    fn list_tokens(&self) -> BoxFuture<'_, Vec<String>, PushPingError>;

    /// The full record for a token, if present.
    fn find_token(&self, token: &str) -> BoxFuture<'_, Option<TokenRecord>, PushPingError>;
}

/// Outbound push notification delivery.
pub trait PushGateway: Send + Sync {
    /// Send one notification to one token; returns the gateway's parsed receipt.
    fn send_notification(
        &self,
        token: &str,
        data: &serde_json::Value,
    ) -> BoxFuture<'_, serde_json::Value, PushPingError>;
}
