//! Configuration for the pushping service.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults (see [`models`]),
//! 2. `config/default.*` and `config/{RUN_ENV}.*` files, both optional,
//! 3. `PUSHPING__SECTION__KEY` environment variables,
//! 4. the conventional `PORT` and `DATABASE_URL` variables.
//!
//! A `.env` file is loaded into the process environment before any of this.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;

pub mod env_vars;
pub mod models;

pub use models::*;

/// Loads the application configuration from files and the environment, then
/// validates it.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    assemble(&prefix, &run_env, &env_vars::conventional_overrides())
}

fn assemble(
    prefix: &str,
    run_env: &str,
    overrides: &[(&'static str, String)],
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    for (path, value) in overrides {
        builder = builder.set_override(*path, value.as_str())?;
    }

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    /// Rejects values the service cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message("database.url is empty".to_string()));
        }
        if !is_sql_identifier(&self.database.collection) {
            return Err(ConfigError::Message(format!(
                "database.collection '{}' must be a plain identifier ([A-Za-z_][A-Za-z0-9_]*)",
                self.database.collection
            )));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "database.connect_timeout_secs must be positive".to_string(),
            ));
        }
        if self.push.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "push.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.broadcast.interval_secs == 0 {
            return Err(ConfigError::Message(
                "broadcast.interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Whether `name` can be spliced into SQL as a table or index name.
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is taken from `DOTENV_OVERRIDE`, else from the first command line
/// argument if it starts with `.env`, else `.env`. Loading happens at most
/// once per process; a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
