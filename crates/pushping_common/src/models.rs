// --- File: crates/pushping_common/src/models.rs ---

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input, PushPingError, TOKEN_REQUIRED};

/// A registered device push token.
///
/// `token` is unique across the store. `created_at` is written once, on the
/// first registration; later registrations only move `updated_at` and bump
/// `registration_count`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenRecord {
    /// The device push token
    pub token: String,

    /// Display name supplied by the client, if any
    pub name: Option<String>,

    /// The timestamp when this token was first registered
    pub created_at: DateTime<Utc>,

    /// The timestamp of the latest registration
    pub updated_at: DateTime<Utc>,

    /// How many times this token has been registered
    pub registration_count: i64,
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; one was created.
    Inserted,
    /// A record existed and was refreshed.
    Updated,
}

impl UpsertOutcome {
    pub fn is_insert(self) -> bool {
        matches!(self, UpsertOutcome::Inserted)
    }
}

/// The `data` payload attached to broadcast notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PingData {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl PingData {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "type": self.kind, "id": self.id })
    }
}

/// Rejects an empty token. Tokens are otherwise opaque and are not trimmed.
pub fn validate_token(token: &str) -> Result<&str, PushPingError> {
    if token.is_empty() {
        return Err(invalid_input(TOKEN_REQUIRED));
    }
    Ok(token)
}

/// A push token cut down for logging above debug level.
pub fn token_hint(token: &str) -> String {
    const SHOWN: usize = 24;
    match token.char_indices().nth(SHOWN) {
        Some((cut, _)) => format!("{}…", &token[..cut]),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token() {
        assert_eq!(validate_token("ExponentPushToken[abc]").unwrap(), "ExponentPushToken[abc]");
        assert!(matches!(
            validate_token(""),
            Err(PushPingError::InvalidInput(msg)) if msg == "token required"
        ));
    }

    #[test]
    fn test_ping_data_serializes_type_field() {
        let data = PingData::new("ping", "auto-5s");
        let value = serde_json::to_value(&data).unwrap();

        assert_eq!(value, serde_json::json!({"type": "ping", "id": "auto-5s"}));
        assert_eq!(data.to_value(), value);
    }

    #[test]
    fn test_upsert_outcome() {
        assert!(UpsertOutcome::Inserted.is_insert());
        assert!(!UpsertOutcome::Updated.is_insert());
    }

    #[test]
    fn test_token_hint_shortens_long_tokens() {
        let token = "ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]";
        assert_eq!(token_hint(token), "ExponentPushToken[xxxxxx…");
        assert_eq!(token_hint("short"), "short");
        assert_eq!(token_hint(&"é".repeat(30)), format!("{}…", "é".repeat(24)));
    }
}
