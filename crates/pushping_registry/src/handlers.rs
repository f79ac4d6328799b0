//! HTTP handlers for token registration

use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::Uri,
};
use pushping_common::{token_hint, PushPingError, TokenStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::logic::{SaveParams, SaveRequest};

pub const SAVED_MESSAGE: &str = "✅ saved";

/// Shared state for registry handlers
#[derive(Clone)]
pub struct RegistryState {
    /// Where registrations are persisted
    pub store: Arc<dyn TokenStore>,
}

/// Response body for a successful registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SaveResponse {
    pub message: String,

    /// True when the token was not known before this call
    pub upserted: bool,
}

/// Liveness probe.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "Registry"
))]
pub async fn liveness_handler() -> &'static str {
    "OK"
}

/// Handler for registering a device token
///
/// The token and optional name come from the JSON body or, failing that, from
/// the query string; see [`SaveRequest::resolve`].
///
/// # Responses
///
/// - 200 OK: token stored, `upserted` tells whether it was new
/// - 400 Bad Request: no token, or a body `name` that is not a string
/// - 500 Internal Server Error: the store failed
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/save",
    params(SaveParams),
    request_body(content = SaveParams, example = json!({"token": "ExponentPushToken[xxxx]", "name": "phone1"})),
    responses(
        (status = 200, description = "Token stored", body = SaveResponse,
         example = json!({"message": "✅ saved", "upserted": true})),
        (status = 400, description = "No token supplied, or a non-string name", body = pushping_common::MessageResponse,
         example = json!({"message": "token required"})),
        (status = 500, description = "Token store failure", body = pushping_common::MessageResponse,
         example = json!({"message": "❌ save failed"}))
    ),
    tag = "Registry"
))]
pub async fn save_handler(
    State(state): State<Arc<RegistryState>>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<SaveResponse>, PushPingError> {
    // a malformed query string counts as an empty one
    let query = Query::<SaveParams>::try_from_uri(&uri)
        .map(|Query(params)| params)
        .unwrap_or_default();

    let request = SaveRequest::resolve(&body, query)
        .inspect_err(|e| debug!("Rejected registration: {}", e))?;

    let outcome = state
        .store
        .upsert_token(&request.token, request.name.as_deref())
        .await
        .inspect_err(|e| error!("Failed to save token {}: {}", token_hint(&request.token), e))?;

    info!(
        "Saved token {} (name: {:?}, new: {})",
        token_hint(&request.token),
        request.name,
        outcome.is_insert()
    );
    debug!("Saved token in full: {}", request.token);

    Ok(Json(SaveResponse {
        message: SAVED_MESSAGE.to_string(),
        upserted: outcome.is_insert(),
    }))
}
