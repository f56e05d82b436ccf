//! Tracing setup for the wrapper.
//!
//! - **stderr**: always on, compact format. CI captures it next to the
//!   external CLI's own output.
//! - **log file**: optional, plain text, opened in append mode so several
//!   pipeline steps can share one file.
//!
//! Every command line reaching these layers has already been redacted.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for a `-v` count.
pub fn filter_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Build the filter: `-v` flags win, then `RUST_LOG`, then `info`.
pub fn env_filter(verbosity: u8) -> EnvFilter {
    if verbosity > 0 {
        return EnvFilter::new(filter_directive(verbosity));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(0)))
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init(log_file: Option<&Path>, verbosity: u8) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter(verbosity))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_levels() {
        assert_eq!(filter_directive(0), "info");
        assert_eq!(filter_directive(1), "debug");
        assert_eq!(filter_directive(2), "trace");
        assert_eq!(filter_directive(9), "trace");
    }

    #[test]
    fn test_verbose_filter_ignores_env() {
        assert_eq!(env_filter(1).to_string(), "debug");
        assert_eq!(env_filter(3).to_string(), "trace");
    }

    #[test]
    fn test_unwritable_log_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("orchrun.log");
        let err = init(Some(&path), 0).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
