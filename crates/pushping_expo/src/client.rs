//! Expo push service client module
//!
//! One notification per request: the client posts a fixed-shape message to the
//! configured endpoint and hands back the service's JSON acknowledgement
//! untouched. Failures are sorted into "the service said no"
//! ([`PushPingError::GatewayRejected`]) and "the service could not be reached"
//! ([`PushPingError::GatewayUnreachable`]).

use pushping_common::{create_client, BoxFuture, PushGateway, PushPingError};
use pushping_config::PushConfig;
use reqwest::{header, Client};
use serde::Serialize;
use tracing::{debug, error};

/// A message to be sent via the Expo push service
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpoMessage {
    /// The device push token
    pub to: String,
    pub sound: String,
    pub title: String,
    pub body: String,
    /// Custom payload delivered to the app with the notification
    pub data: serde_json::Value,
}

/// Client for the Expo push service
#[derive(Debug, Clone)]
pub struct ExpoClient {
    /// HTTP client with the request timeout applied
    client: Client,

    /// Endpoint and presentation fields
    config: PushConfig,
}

impl ExpoClient {
    /// Creates a new client; every request gives up after
    /// `config.request_timeout_secs`.
    pub fn new(config: PushConfig) -> Result<Self, PushPingError> {
        let client = create_client(config.request_timeout_secs)
            .map_err(|e| PushPingError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// The message that would be sent to `token`.
    pub fn build_message(&self, token: &str, data: &serde_json::Value) -> ExpoMessage {
        ExpoMessage {
            to: token.to_string(),
            sound: self.config.sound.clone(),
            title: self.config.title.clone(),
            body: self.config.body.clone(),
            data: data.clone(),
        }
    }

    /// Sends a single message, returning the service's acknowledgement.
    ///
    /// # Errors
    ///
    /// * `GatewayRejected` for a non-2xx status, or a 2xx whose body is not JSON
    /// * `GatewayUnreachable` when no response arrives (connect error, timeout)
    pub async fn send_message(
        &self,
        message: &ExpoMessage,
    ) -> Result<serde_json::Value, PushPingError> {
        debug!("Sending push notification to {}", message.to);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(message)
            .send()
            .await
            .map_err(|e| {
                error!("Push gateway request failed: {}", e);
                PushPingError::GatewayUnreachable(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PushPingError::GatewayUnreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(PushPingError::GatewayRejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|_| PushPingError::GatewayRejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl PushGateway for ExpoClient {
    fn send_notification(
        &self,
        token: &str,
        data: &serde_json::Value,
    ) -> BoxFuture<'_, serde_json::Value, PushPingError> {
        let message = self.build_message(token, data);
        Box::pin(async move { self.send_message(&message).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_message_uses_configured_presentation() {
        let client = ExpoClient::new(PushConfig {
            title: "Hi".to_string(),
            ..PushConfig::default()
        })
        .unwrap();

        let message = client.build_message("ExponentPushToken[x]", &json!({"type": "ping"}));

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "to": "ExponentPushToken[x]",
                "sound": "default",
                "title": "Hi",
                "body": "Automated ping from server",
                "data": {"type": "ping"}
            })
        );
    }
}
