//! Tracing setup for the binary: stdout plus an optional log file.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Result, WedofError};

/// Log file written next to the working directory unless configured otherwise.
pub const DEFAULT_LOG_FILE: &str = "wedof_sync.log";

/// Log file named by `WEDOF_LOG_FILE`.
///
/// Unset means [`DEFAULT_LOG_FILE`]; an empty value disables file logging.
pub fn log_file_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    match lookup("WEDOF_LOG_FILE") {
        None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(PathBuf::from(value.trim())),
    }
}

/// Append-only, never-rotated appender for `path`.
pub fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| WedofError::Config(format!("log file {} has no name", path.display())))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| WedofError::Config(format!("cannot open log file {}: {e}", path.display())))
}

/// Install the global subscriber: stdout, plus `log_file` when given.
///
/// The filter honours `RUST_LOG` and defaults to `info`. Keep the returned
/// guard alive until exit, dropping it flushes the file.
pub fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let (file_writer, guard, failure) = match log_file.map(file_appender).transpose() {
        Ok(Some(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard), None)
        }
        Ok(None) => (None, None, None),
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .with(file_writer.map(|writer| fmt::layer().with_writer(writer).with_ansi(false)))
        .init();

    if let Some(e) = failure {
        tracing::warn!(error = %e, "file logging disabled");
    }
    guard
}
