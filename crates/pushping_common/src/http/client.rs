// --- File: crates/pushping_common/src/http/client.rs ---
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Creates an HTTP client whose requests give up after `timeout_secs`.
///
/// Redirects follow reqwest's default policy.
pub fn create_client(timeout_secs: u64) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}
