//! Device token registration for pushping
//!
//! An axum router accepting push tokens and persisting them through any
//! [`pushping_common::TokenStore`].
//!
//! # Example
//!
//! ```rust,no_run
//! use pushping_common::TokenStore;
//! use pushping_registry::routes;
//! use std::sync::Arc;
//!
//! fn setup_app(store: Arc<dyn TokenStore>) -> axum::Router {
//!     routes(store)
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Liveness probe, answers `OK`
//! - `POST /save` - Register a token (`{token, name?}` as JSON body or query)

#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

pub use logic::{SaveParams, SaveRequest};
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::RegistryApiDoc;
}
