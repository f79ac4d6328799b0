use axum::{
    routing::{get, post},
    Router,
};
use pushping_common::TokenStore;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{liveness_handler, save_handler, RegistryState};

/// Create the registration routes
///
/// * `GET /` liveness
/// * `POST /save` token registration
pub fn routes(store: Arc<dyn TokenStore>) -> Router {
    let state = Arc::new(RegistryState { store });

    info!("Registry routes initialized");

    Router::new()
        .route("/", get(liveness_handler))
        .route("/save", post(save_handler))
        .with_state(state)
}
