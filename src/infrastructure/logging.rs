//! Logging system configuration and initialization
//!
//! The library itself only emits `tracing` events. Binaries call
//! [`init_logging_with_config`] once to install a subscriber with:
//! - Console output on stderr (stdout stays free for extracted data)
//! - Optional file output through a non-blocking appender
//! - Optional JSON formatting
//! - `RUST_LOG` overriding the configured levels

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::Local;
use once_cell::sync::Lazy;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::{self, time::FormatTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the file writer alive for the lifetime of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Local wall-clock timestamps with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Directory for log files: the configured one, or `logs/` next to the executable
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(dir) = &config.log_dir {
        return dir.clone();
    }

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Build the level filter. `RUST_LOG` wins over the configuration when set.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let mut modules: Vec<(&String, &String)> = config.module_filters.iter().collect();
    modules.sort();
    for (module, level) in modules {
        let directive: Directive = format!("{module}={level}")
            .parse()
            .with_context(|| format!("Invalid log filter '{module}={level}'"))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}

fn console_layer(config: &LoggingConfig) -> BoxedLayer {
    let layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_timer(LocalTimeFormatter)
        .with_target(false);

    if config.json_format {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Dropping a guard stops its writer, so a poisoned lock is recovered rather than skipped
fn keep_guard(guards: &Mutex<Vec<WorkerGuard>>, guard: WorkerGuard) {
    guards.lock().unwrap_or_else(PoisonError::into_inner).push(guard);
}

fn file_layer(config: &LoggingConfig) -> Result<BoxedLayer> {
    let log_dir = get_log_directory(config);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let (writer, guard) = non_blocking(rolling::never(&log_dir, &config.file_name));
    keep_guard(&LOG_GUARDS, guard);

    let layer = fmt::Layer::new()
        .with_writer(writer)
        .with_timer(LocalTimeFormatter)
        .with_ansi(false);

    Ok(if config.json_format {
        layer
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        layer.with_target(false).boxed()
    })
}

/// Initialize logging with custom configuration.
/// Fails if a global subscriber has already been installed.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.console_output {
        layers.push(console_layer(config));
    }
    if config.file_output {
        layers.push(file_layer(config)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        "Logging initialized (level: {}, console: {}, file: {})",
        config.level,
        config.console_output,
        config.file_output
    );
    Ok(())
}
