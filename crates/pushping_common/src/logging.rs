//! Logging utilities for the pushping service.
//!
//! Every crate logs through `tracing`; this module installs the subscriber once
//! at startup.

use tracing::{info, warn, Level};
use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    fmt,
    prelude::*,
    EnvFilter,
};

/// Initialize the tracing subscriber at INFO.
///
/// # Examples
///
/// ```
/// use pushping_common::logging;
///
/// logging::init();
/// logging::init_with_level("debug");
/// ```
pub fn init() {
    init_with_level(&Level::INFO.to_string());
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` is honoured as well; the `pushping=<level>` directive is added on
/// top of it. An unparsable level falls back to INFO with a warning. Calling this
/// more than once is harmless.
pub fn init_with_level(level: &str) {
    let (directive, rejected) = match pushping_directive(level) {
        Ok(directive) => (directive, None),
        Err(_) => (Directive::from(LevelFilter::INFO), Some(level.to_string())),
    };

    let filter = EnvFilter::from_default_env().add_directive(directive);

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        match rejected {
            Some(level) => warn!("Unknown log level '{}', logging at info", level),
            None => info!("Logging initialized at level: {}", level),
        }
    }
}

fn pushping_directive(level: &str) -> Result<Directive, tracing_subscriber::filter::ParseError> {
    format!("pushping={}", level.trim().to_lowercase()).parse()
}
