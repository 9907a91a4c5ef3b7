//! Logging setup for the annotator binary.
//!
//! Logs go to stderr and to daily-rotating files in the platform data
//! directory. Warnings and errors are also collected in a separate
//! `error.log`, which is the file to attach to bug reports.
//!
//! ```no_run
//! use annotator::logging;
//!
//! logging::init(false).expect("Failed to initialize logging");
//! tracing::info!("Session loaded");
//! ```
//!
//! The file filter defaults to `info` and follows `RUST_LOG` when set.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const APP_DIR: &str = "annotator";
const LOG_PREFIX: &str = "annotator";
const MAX_LOG_FILES: usize = 10;

/// `<data dir>/annotator/logs`, created if missing.
///
/// - Windows: `%APPDATA%/annotator/logs`
/// - macOS: `~/Library/Application Support/annotator/logs`
/// - Linux: `~/.local/share/annotator/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    log_dir_in(&base_dir)
}

fn log_dir_in(base_dir: &Path) -> Result<PathBuf> {
    let log_dir = base_dir.join(APP_DIR).join("logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }
    Ok(log_dir)
}

fn appender(log_dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

/// Install the global subscriber.
///
/// The console only shows warnings unless `verbose` is set, so that command
/// output on stdout stays readable.
///
/// # Errors
///
/// Fails if the log directory or the file appenders cannot be created.
pub fn init(verbose: bool) -> Result<()> {
    let log_dir = get_log_dir()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let all_logs_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(appender(&log_dir, LOG_PREFIX)?);

    let error_logs_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(appender(&log_dir, "error")?)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .init();

    tracing::info!("Logging initialized, log directory: {}", log_dir.display());
    Ok(())
}

/// Today's log file. The appender rotates on UTC dates.
pub fn get_current_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    Ok(log_file_for(&log_dir, chrono::Utc::now().date_naive()))
}

fn log_file_for(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{LOG_PREFIX}.{}.log", date.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_is_created() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let log_dir = log_dir_in(temp_dir.path()).expect("log dir");
        assert!(log_dir.is_dir());
        assert!(log_dir.ends_with(Path::new("annotator").join("logs")));
    }

    #[test]
    fn test_log_file_is_named_by_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).expect("valid date");
        assert_eq!(
            log_file_for(Path::new("logs"), date),
            Path::new("logs").join("annotator.2026-03-07.log")
        );
    }

    #[test]
    fn test_appender_writes_into_log_dir() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        assert!(appender(temp_dir.path(), "error").is_ok());
    }
}
