// --- File: crates/pushping_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pushping.db";
pub const DEFAULT_COLLECTION: &str = "push_tokens";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16, // also taken from PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite://data/pushping.db` (also taken from DATABASE_URL)
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Table holding the token records
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            collection: default_collection(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// --- Push Gateway Config ---
// The presentation fields are sent with every notification.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushConfig {
    #[serde(default = "default_push_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_body")]
    pub body: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            endpoint: default_push_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            sound: default_sound(),
            title: default_title(),
            body: default_body(),
        }
    }
}

// --- Broadcast Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BroadcastConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// `data.type` of every broadcast notification
    #[serde(default = "default_data_type")]
    pub data_type: String,
    /// `data.id` of every broadcast notification
    #[serde(default = "default_data_id")]
    pub data_id: String,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            data_type: default_data_type(),
            data_id: default_data_id(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_push_endpoint() -> String {
    DEFAULT_PUSH_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_sound() -> String {
    "default".to_string()
}

fn default_title() -> String {
    "Hello 👋".to_string()
}

fn default_body() -> String {
    "Automated ping from server".to_string()
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_data_type() -> String {
    "ping".to_string()
}

fn default_data_id() -> String {
    "auto-5s".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
