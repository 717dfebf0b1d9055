#![forbid(unsafe_code)]

//! Tracing subscriber setup.
//!
//! The terminal belongs to the UI, so log output only ever goes to a file.
//! Without a log file no subscriber is installed and events are discarded.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::AppError;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "VIBEHUB_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Build the filter from `VIBEHUB_LOG`, falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a global fmt subscriber appending to `path`.
pub fn init(path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| AppError::Logging {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|err| AppError::Logging {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "vibehub logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_reported() {
        let err = init(Path::new("/nonexistent-vibehub-dir/sub/log.txt")).unwrap_err();
        assert!(matches!(err, AppError::Logging { .. }));
        assert!(err.to_string().contains("/nonexistent-vibehub-dir"));
    }
}
