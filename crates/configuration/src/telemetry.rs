use crate::error::ConfigError;
use crate::settings::Telemetry;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "emalab.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides `log_level`. With a `log_dir`, a second layer writes
/// plain-text logs to a daily-rolling file; the returned guard flushes it and
/// must live as long as the process logs.
pub fn init_tracing(settings: &Telemetry) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .map_err(|e| ConfigError::TelemetryError(e.to_string()))?;

    let (file_layer, guard) = match &settings.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::TelemetryError(e.to_string()))?;

    Ok(guard)
}
