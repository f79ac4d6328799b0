//! Database client for pushping
//!
//! A thin wrapper around an `sqlx::Any` pool so the same code runs against
//! SQLite and PostgreSQL.

use crate::error::DbError;
use pushping_config::DatabaseConfig;
use sqlx::pool::PoolOptions;
use sqlx::Pool;
use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// Database client for pushping
#[derive(Debug, Clone)]
pub struct DbClient {
    /// The database connection pool
    pool: Pool<sqlx::Any>,
}

impl DbClient {
    /// Create a new database client from a database configuration
    ///
    /// Gives up with [`DbError::ConnectTimeout`] if the pool cannot be opened
    /// within `connect_timeout_secs`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    ///
    /// * The database URL is empty or invalid
    /// * The database connection fails or times out
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        let db_url = &db_config.url;
        if db_url.trim().is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }

        let timeout_secs = db_config.connect_timeout_secs;
        let pool = with_connect_timeout(
            timeout_secs,
            Self::create_pool(db_url, Duration::from_secs(timeout_secs)),
        )
        .await?;

        Ok(Self { pool })
    }

    async fn create_pool(db_url: &str, acquire_timeout: Duration) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        // Registers every driver compiled into sqlx with the Any driver
        sqlx::any::install_default_drivers();

        let mut pool_options = PoolOptions::new()
            .max_connections(5)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600));

        if let Some(db_path) = sqlite_path(db_url) {
            if is_in_memory(db_path) {
                // every connection to :memory: is its own database
                pool_options = pool_options
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None);
            } else {
                ensure_sqlite_file(db_path)?;
            }
        }

        let connect_options = sqlx::any::AnyConnectOptions::from_str(db_url)?;
        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    /// Execute a statement that returns no rows, yielding the rows affected.
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check if the database is healthy
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Close every connection in the pool. Later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Bounds a connect attempt to `timeout_secs`, mapping expiry to
/// [`DbError::ConnectTimeout`].
async fn with_connect_timeout<F, T>(timeout_secs: u64, connect: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    tokio::time::timeout(Duration::from_secs(timeout_secs), connect)
        .await
        .map_err(|_| {
            error!("Database connection timed out after {}s", timeout_secs);
            DbError::ConnectTimeout(timeout_secs)
        })?
}

/// The file part of a SQLite URL, or `None` for other schemes.
///
/// Handles both `sqlite:example.db` and `sqlite://example.db`, with or without
/// a `?mode=...` query.
fn sqlite_path(db_url: &str) -> Option<&str> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))?;
    Some(rest.split('?').next().unwrap_or(rest))
}

fn is_in_memory(db_path: &str) -> bool {
    db_path.is_empty() || db_path.contains(":memory:")
}

// AnyConnectOptions cannot set create_if_missing, so create the file up front
fn ensure_sqlite_file(db_path: &str) -> Result<(), DbError> {
    let path = Path::new(db_path);

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating directory for SQLite database: {:?}", dir);
            std::fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create directory for SQLite database: {}", e);
                DbError::PoolError(format!("Failed to create directory: {}", e))
            })?;
        }
    }

    if !path.exists() {
        debug!("Creating empty SQLite database file: {}", db_path);
        std::fs::File::create(path).map_err(|e| {
            error!("Failed to create SQLite database file: {}", e);
            DbError::PoolError(format!("Failed to create database file: {}", e))
        })?;
    }

    Ok(())
}
