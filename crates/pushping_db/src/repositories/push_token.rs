//! SQL implementation of the token store
//!
//! One table (the configured collection) keyed by a unique index on `token`.
//! Timestamps are stored as RFC 3339 text: `DateTime<Utc>` has no `Decode`
//! impl for `sqlx::Any`.

use crate::error::DbError;
use crate::DbClient;
use chrono::{DateTime, SecondsFormat, Utc};
use pushping_common::{
    validate_token, BoxFuture, PushPingError, TokenRecord, TokenStore, UpsertOutcome,
};
use pushping_config::{is_sql_identifier, DatabaseConfig};
use sqlx::any::AnyRow;
use sqlx::Row;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

/// Token store over an SQL database.
///
/// The pool is opened lazily by [`connect`](Self::connect) and memoized; the
/// repository is meant to be shared behind an `Arc`.
#[derive(Debug)]
pub struct SqlTokenRepository {
    config: DatabaseConfig,
    client: OnceCell<DbClient>,
    closed: AtomicBool,
}

impl SqlTokenRepository {
    /// Create a repository for `config.collection` in `config.url`.
    ///
    /// Nothing is opened yet. Fails if the collection name cannot be used as a
    /// table name.
    pub fn new(config: DatabaseConfig) -> Result<Self, DbError> {
        if !is_sql_identifier(&config.collection) {
            return Err(DbError::ConfigError(format!(
                "'{}' is not a valid collection name",
                config.collection
            )));
        }
        Ok(Self {
            config,
            client: OnceCell::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// The table holding the tokens.
    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Open the pool and set up the schema, once.
    ///
    /// Concurrent first callers wait on the same initialisation; later calls
    /// return the memoized client. A failed attempt is not memoized.
    pub async fn connect(&self) -> Result<&DbClient, DbError> {
        self.client
            .get_or_try_init(|| async {
                let client = DbClient::from_config(&self.config).await?;
                init_schema(&client, self.collection()).await?;
                info!(
                    "Token store connected (collection: {})",
                    self.collection()
                );
                Ok(client)
            })
            .await
    }

    /// Close the pool. Only the first call on a connected store does anything;
    /// closing a store that never connected leaves it free to connect later.
    pub async fn close(&self) {
        let Some(client) = self.client.get() else {
            return;
        };
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        client.close().await;
        info!("Token store connection closed");
    }

    /// Insert or refresh a token record.
    pub async fn upsert(&self, token: &str, name: Option<&str>) -> Result<UpsertOutcome, DbError> {
        debug!("Upserting token: {}", token);
        let client = self.connect().await?;

        let now = format_timestamp(Utc::now());
        let query = format!(
            r#"
            INSERT INTO {t} (token, name, created_at, updated_at, registration_count)
            VALUES ($1, $2, $3, $4, 1)
            ON CONFLICT (token) DO UPDATE
            SET name = excluded.name,
                updated_at = excluded.updated_at,
                registration_count = {t}.registration_count + 1
            RETURNING registration_count
            "#,
            t = self.collection()
        );

        let row = sqlx::query(&query)
            .bind(token)
            .bind(name.map(str::to_string))
            .bind(&now)
            .bind(&now)
            .fetch_one(client.pool())
            .await
            .map_err(|e| {
                error!("Failed to upsert token: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        let count: i64 = row
            .try_get("registration_count")
            .map_err(|e| DbError::DecodeError(e.to_string()))?;

        Ok(if count == 1 {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }

    /// All tokens, oldest registration first.
    pub async fn all_tokens(&self) -> Result<Vec<String>, DbError> {
        let client = self.connect().await?;
        let query = format!(
            "SELECT token FROM {} ORDER BY created_at, token",
            self.collection()
        );

        let rows = sqlx::query(&query)
            .fetch_all(client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list tokens: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("token")
                    .map_err(|e| DbError::DecodeError(e.to_string()))
            })
            .collect()
    }

    /// The record for `token`, if one exists.
    pub async fn find(&self, token: &str) -> Result<Option<TokenRecord>, DbError> {
        let client = self.connect().await?;
        let query = format!(
            r#"
            SELECT token, name, created_at, updated_at, registration_count
            FROM {}
            WHERE token = $1
            "#,
            self.collection()
        );

        let row = sqlx::query(&query)
            .bind(token)
            .fetch_optional(client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find token: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.as_ref().map(record_from_row).transpose()
    }
}

impl TokenStore for SqlTokenRepository {
    fn upsert_token(
        &self,
        token: &str,
        name: Option<&str>,
    ) -> BoxFuture<'_, UpsertOutcome, PushPingError> {
        // checked before connect(): an empty token never reaches the database
        let validated = validate_token(token).map(str::to_string);
        let name = name.map(str::to_string);

        Box::pin(async move {
            let token = validated?;
            Ok(self.upsert(&token, name.as_deref()).await?)
        })
    }

    fn list_tokens(&self) -> BoxFuture<'_, Vec<String>, PushPingError> {
        Box::pin(async move { Ok(self.all_tokens().await?) })
    }

    fn find_token(&self, token: &str) -> BoxFuture<'_, Option<TokenRecord>, PushPingError> {
        let token = token.to_string();
        Box::pin(async move { Ok(self.find(&token).await?) })
    }
}

async fn init_schema(client: &DbClient, table: &str) -> Result<(), DbError> {
    debug!("Initializing token schema for table {}", table);

    let create_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            token TEXT NOT NULL,
            name TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            registration_count INTEGER NOT NULL DEFAULT 1
        )
        "#
    );
    client.execute(&create_table).await?;

    let create_index =
        format!("CREATE UNIQUE INDEX IF NOT EXISTS {table}_token_key ON {table} (token)");
    client.execute(&create_index).await?;

    Ok(())
}

// Fixed width (micros, `Z`) so text order equals time order.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("bad timestamp '{}': {}", value, e)))
}

fn record_from_row(row: &AnyRow) -> Result<TokenRecord, DbError> {
    let decode = |e: sqlx::Error| DbError::DecodeError(e.to_string());

    let created_at: String = row.try_get("created_at").map_err(decode)?;
    let updated_at: String = row.try_get("updated_at").map_err(decode)?;

    Ok(TokenRecord {
        token: row.try_get("token").map_err(decode)?,
        name: row.try_get("name").map_err(decode)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        registration_count: row.try_get("registration_count").map_err(decode)?,
    })
}
