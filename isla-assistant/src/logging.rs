//! Subscriber set-up for the `isla` binary.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{AssistantError, Result};

/// Environment variable naming an optional log file.
pub const LOG_FILE_ENV: &str = "ISLA_LOG_FILE";

/// Install the global subscriber.
///
/// The level comes from `RUST_LOG` (default `info`). Events go to stderr and,
/// when `log_file` is given, are also appended to that file without colours.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path).map_err(|e| {
                AssistantError::Initialization(format!("cannot open log file {}: {e}", path.display()))
            })?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| AssistantError::Initialization(format!("logging already initialized: {e}")))
}
