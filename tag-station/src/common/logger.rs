//! Logging Infrastructure
//!
//! Structured logging setup:
//! - Console output, pretty for development or JSON
//! - Optional daily rotating log files (last 14 kept)

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

/// Number of daily log files kept before the oldest is deleted
const MAX_LOG_FILES: usize = 14;

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level used when `RUST_LOG` is unset (e.g., "info", "debug")
/// * `json_format` - JSON console output instead of the pretty format
/// * `log_dir` - Optional directory for daily rotating log files
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            fs::create_dir_all(log_dir)?;

            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("tag-station")
                .filename_suffix("log")
                .max_log_files(MAX_LOG_FILES)
                .build(log_dir)?;

            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::sync::Mutex::new(appender))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
