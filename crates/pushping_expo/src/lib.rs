//! Expo push service integration for pushping
//!
//! Sends single push notifications through the Expo push API
//! (`https://exp.host/--/api/v2/push/send` by default). [`ExpoClient`]
//! implements [`pushping_common::PushGateway`], which is all the broadcast
//! scheduler needs.
//!
//! # Example
//!
//! ```rust,no_run
//! use pushping_config::PushConfig;
//! use pushping_expo::ExpoClient;
//!
//! async fn ping(token: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ExpoClient::new(PushConfig::default())?;
//!     let message = client.build_message(token, &serde_json::json!({"type": "ping"}));
//!     let receipt = client.send_message(&message).await?;
//!     println!("receipt: {}", receipt);
//!     Ok(())
//! }
//! ```

pub mod client;

pub use client::{ExpoClient, ExpoMessage};
