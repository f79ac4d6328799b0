//! Token store for pushping
//!
//! Persists device push tokens through SQLx's database agnostic `Any` driver.
//! SQLite is compiled in by default; PostgreSQL is available behind the
//! `postgres` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use pushping_config::DatabaseConfig;
//! use pushping_db::SqlTokenRepository;
//!
//! async fn setup_store() -> Result<SqlTokenRepository, Box<dyn std::error::Error>> {
//!     let store = SqlTokenRepository::new(DatabaseConfig::default())?;
//!     store.connect().await?;
//!     Ok(store)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::SqlTokenRepository;
