// --- File: crates/services/pushping_backend/src/app_state.rs ---
use pushping_broadcast::Broadcaster;
use pushping_common::{PushGateway, PushPingError, TokenStore};
use pushping_config::AppConfig;
use pushping_db::SqlTokenRepository;
use pushping_expo::ExpoClient;
use std::sync::Arc;
use tracing::info;

/// Everything the service shares between the HTTP side and the broadcast loop.
///
/// The store is held concretely so its lifecycle (`connect` / `close`) stays
/// reachable; consumers only see it as `dyn TokenStore`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<SqlTokenRepository>,
    pub gateway: Arc<dyn PushGateway>,
}

impl AppState {
    /// Build the services and connect to the token store.
    ///
    /// Connecting eagerly makes a broken database fail startup instead of the
    /// first request.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, PushPingError> {
        let store = Arc::new(SqlTokenRepository::new(config.database.clone())?);
        store.connect().await?;
        info!(
            "Using database {} (collection: {})",
            config.database.url,
            store.collection()
        );

        let gateway = Arc::new(ExpoClient::new(config.push.clone())?);

        Ok(Self {
            config,
            store,
            gateway,
        })
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.store.clone()
    }

    /// A broadcaster over this state's store and gateway, not yet started.
    pub fn broadcaster(&self) -> Broadcaster {
        Broadcaster::from_config(
            self.token_store(),
            self.gateway.clone(),
            &self.config.broadcast,
        )
    }

    /// Close the store connection. Safe to call more than once.
    pub async fn close(&self) {
        self.store.close().await;
    }
}
