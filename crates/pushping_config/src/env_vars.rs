//! Environment variable handling for the pushping service.
//!
//! Configuration paths map onto prefixed variables
//! (`server.port` → `PUSHPING__SERVER__PORT`). A handful of conventional
//! unprefixed variables (`PORT`, `DATABASE_URL`) are honoured as well, since
//! most hosting platforms inject exactly those.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "PUSHPING";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Unprefixed variables and the configuration path they override.
pub const CONVENTIONAL_OVERRIDES: &[(&str, &str)] =
    &[("PORT", "server.port"), ("DATABASE_URL", "database.url")];

/// Variable that replaces [`DEFAULT_PREFIX`] when set to a non-blank value.
pub const PREFIX_OVERRIDE_VAR: &str = "PUSHPING_CONFIG_PREFIX";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    prefix_from(|name| env::var(name).ok())
}

fn prefix_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(PREFIX_OVERRIDE_VAR)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `prefix` - The variable prefix (usually [`DEFAULT_PREFIX`])
/// * `path` - The configuration path (e.g., "server.port")
///
/// # Returns
///
/// The environment variable name (e.g., "PUSHPING__SERVER__PORT")
pub fn config_path_to_env_var(prefix: &str, path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Collect the conventional overrides that are present in the environment.
///
/// Empty values are ignored so that `PORT=` does not wipe the configured port.
pub fn conventional_overrides() -> Vec<(&'static str, String)> {
    collect_overrides(|name| env::var(name).ok())
}

fn collect_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    CONVENTIONAL_OVERRIDES
        .iter()
        .filter_map(|(var, path)| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*path, value))
        })
        .collect()
}
