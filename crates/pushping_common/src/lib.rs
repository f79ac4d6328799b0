// --- File: crates/pushping_common/src/lib.rs ---

pub mod error; // Error taxonomy
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Shared data structures
pub mod services; // Store and gateway abstractions

pub use error::{
    invalid_input, store_unavailable, HttpStatusCode, PushPingError, TOKEN_REQUIRED,
};

pub use http::{client::create_client, IntoHttpResponse, MessageResponse};

pub use logging::{init, init_with_level};

pub use models::{token_hint, validate_token, PingData, TokenRecord, UpsertOutcome};

pub use services::{BoxFuture, PushGateway, TokenStore};
