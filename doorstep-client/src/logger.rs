//! Logging Infrastructure
//!
//! Structured logging for applications embedding the client:
//! - Console output, pretty or JSON
//! - Optional daily rotating application logs
//! - Separate payment log for events with target `"payment"`

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Target used by checkout events that go to the payment log
pub const PAYMENT_TARGET: &str = "payment";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Delete rotated application logs older than `keep_days`
pub fn cleanup_old_logs(log_dir: &Path, keep_days: i64) -> anyhow::Result<()> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(keep_days);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // app.YYYY-MM-DD
        if let Some(date_part) = name.strip_prefix("app.")
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(())
}

/// Initialize console logging only
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Default level when `RUST_LOG` is not set (e.g., "info", "debug")
/// * `json_format` - JSON console output (production) instead of pretty (development)
/// * `log_dir` - Optional directory for daily rotating file logs
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if json_format {
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        );
    } else {
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        );
    }

    if let Some(dir) = log_dir {
        let app_log_dir = dir.join("app");
        let payment_log_dir = dir.join("payment");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&payment_log_dir)?;

        let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != PAYMENT_TARGET
                }))
                .boxed(),
        );

        // Payment events are kept apart so they survive app log cleanup
        let payment_log = RollingFileAppender::new(Rotation::DAILY, payment_log_dir, "payment");
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(payment_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == PAYMENT_TARGET
                }))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}
