use std::sync::atomic::{AtomicBool, Ordering};

use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// HTTP stack crates that flood `debug`; held at `warn` unless named in the filter.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "h2", "reqwest", "rustls", "tower"];

static INSTALLED: AtomicBool = AtomicBool::new(false);

pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    if INSTALLED.load(Ordering::Acquire) {
        return Err(LoggerError::AlreadyInitialized);
    }

    let output = output_layer(cfg)?;
    let filter = build_filter(&cfg.level)?;

    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::InitializationFailed(e.to_string()))?;

    INSTALLED.store(true, Ordering::Release);
    tracing::debug!(format = %cfg.format, level = %cfg.level, "logger installed");
    Ok(())
}

fn output_layer(cfg: &LoggerConfig) -> Result<BoxedLayer, LoggerError> {
    let layer = match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_ansi(cfg.use_color)
            .with_target(cfg.with_targets)
            .with_timer(local_timer())
            .boxed(),
        LoggerFormat::Json => fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_current_span(false)
            .with_timer(local_timer())
            .boxed(),
        LoggerFormat::Journald => journald_layer()?,
    };
    Ok(layer)
}

pub(crate) fn build_filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(directives(level)).map_err(|e| LoggerError::InvalidLogLevel {
        directives: level.trim().to_string(),
        reason: e.to_string(),
    })
}

/// `level` plus a `warn` directive for each of [`QUIET_TARGETS`] it leaves unset.
fn directives(level: &str) -> String {
    let level = level.trim();
    let mut out = if level.is_empty() {
        "info".to_string()
    } else {
        level.to_string()
    };

    for target in QUIET_TARGETS {
        let named = level
            .split(',')
            .filter_map(|d| d.split(['=', '[']).next())
            .any(|t| t.trim() == *target);
        if !named {
            out.push_str(&format!(",{target}=warn"));
        }
    }
    out
}

fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald_layer() -> Result<BoxedLayer, LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?
        .with_syslog_identifier("aleo-exporterd".to_string());
    Ok(layer.boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald_layer() -> Result<BoxedLayer, LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
