//! Log setup for the terminal UI.
//!
//! Stdout belongs to the drawing loop, so logs go to a daily-rolling file
//! instead. Logging stays off unless a log directory is configured.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive. Dropping it flushes whatever is
/// still buffered, so it must live until the program exits.
pub struct LoggerGuard {
    _guard: Option<WorkerGuard>,
}

/// Initialize tracing. With `log_dir` set, events are written to
/// `<log_dir>/rickmorty-browser.<date>.log`; without it, tracing stays
/// uninitialized and all events are dropped.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(log_dir: Option<&Path>) -> Result<LoggerGuard> {
    let Some(dir) = log_dir else {
        return Ok(LoggerGuard { _guard: None });
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("rickmorty-browser")
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to open log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rickmorty_browser=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(LoggerGuard {
        _guard: Some(guard),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_dir_is_a_no_op() {
        // Must not install a subscriber, so calling it in tests is safe.
        let guard = init_logging(None).expect("no-op init succeeds");
        drop(guard);
    }
}
