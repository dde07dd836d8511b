use crate::config::LoggingConfig;
use crate::error::{CoreError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber: a daily-rolling file layer under
/// `config.dir`, plus an optional stderr layer.
///
/// The returned guard must be kept alive for buffered lines to be flushed.
pub fn init_logging(component: &str, config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.dir)?;

    // Roll daily, with the component name as the prefix
    let file_appender = tracing_appender::rolling::daily(&config.dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = if config.to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).try_init()
    } else {
        registry.try_init()
    };

    installed.map_err(|e| CoreError::Invariant(format!("logging already initialized: {e}")))?;
    Ok(guard)
}
