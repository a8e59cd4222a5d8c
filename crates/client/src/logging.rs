//! Logging to a per-day file, plus stderr when asked for.
//!
//! The file layer follows `RUST_LOG` (default `info`). Stderr only shows
//! warnings unless `-v` is given, so command output stays readable.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::dirs;

/// Setup logging to both stderr and file.
///
/// Keep the returned guard alive until exit; dropping it flushes the file.
pub fn setup_logging(log_dir: Option<&Path>, verbosity: u8) -> Result<WorkerGuard> {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(dirs::log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(env_filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_level(verbosity));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::debug!("Log directory: {}", log_dir.display());

    Ok(guard)
}

fn stderr_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_stderr_level() {
        assert_eq!(stderr_level(0), LevelFilter::WARN);
        assert_eq!(stderr_level(1), LevelFilter::INFO);
        assert_eq!(stderr_level(4), LevelFilter::DEBUG);
    }
}
