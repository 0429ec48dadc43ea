//! Logging configuration for MDB components
//!
//! The TUI owns stdout, so its diagnostics go to a file: one record per key
//! event or internal error, for post-mortem reading only. Provides:
//! - File logging to a temporary directory with daily rotation
//! - Environment variable support (RUST_LOG)
//! - Console-only setup for tests

use eyre::Result;
use std::{env, fs, path::PathBuf, sync::Once};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize file-only logging for a component.
///
/// No console layer is installed: binaries that call this render to the
/// terminal themselves and must not have log lines interleaved with their
/// output.
///
/// Returns the log directory together with the appender guard. The caller
/// keeps the guard alive for the process lifetime so buffered records are
/// flushed when it drops on exit.
///
/// # Arguments
/// * `component_name` - Name of the component (e.g. "mdb-tui")
pub fn init_file_only_logging(component_name: &str) -> Result<(PathBuf, WorkerGuard)> {
    // Create environment filter with default INFO level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("Failed to create environment filter");

    let log_dir = create_log_directory(component_name)?;

    // File appender with daily rotation
    let file_appender = rolling::daily(&log_dir, format!("{component_name}.log"));
    let (non_blocking_appender, guard) = non_blocking(file_appender);

    // No colors in files
    let file_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(non_blocking_appender);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(
        component = component_name,
        log_dir = %log_dir.display(),
        "Logging initialized with file output only"
    );

    Ok((log_dir, guard))
}

/// Create log directory in system temp folder
fn create_log_directory(component_name: &str) -> Result<PathBuf> {
    let temp_dir = env::temp_dir();
    let log_dir = temp_dir.join("mdb-logs").join(component_name);

    fs::create_dir_all(&log_dir)?;

    Ok(log_dir)
}

// Global test logging initialization - ensures logging is only set up once across all tests
static TEST_LOGGING_INIT: Once = Once::new();

/// Safe logging initialization for tests - can be called multiple times without crashing
///
/// Console-only output, INFO level by default, `RUST_LOG` respected.
/// Idempotent via `std::sync::Once`; if a subscriber is already installed
/// the attempt is silently ignored.
pub fn ensure_test_logging() {
    TEST_LOGGING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .compact()
            .try_init();
    });
}
