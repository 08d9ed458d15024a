//! Global subscriber setup.
//!
//! A single fmt layer writing to stderr, filtered by `EnvFilter`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::error::ObservabilityError;

/// Install the global tracing subscriber.
///
/// Fails if the level directive does not parse or a subscriber is already set.
pub fn init(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    build_subscriber(&config)?
        .try_init()
        .map_err(|e| ObservabilityError::InitFailed(e.to_string()))?;

    tracing::debug!(
        service.name = %config.service_name,
        service.version = config.service_version.as_deref().unwrap_or("unknown"),
        "tracing initialized"
    );

    Ok(())
}

/// Registry + filter + one stderr fmt layer in the configured format.
fn build_subscriber(
    config: &ObservabilityConfig,
) -> Result<impl tracing::Subscriber + Send + Sync + use<>, ObservabilityError> {
    let env_filter = build_filter(config.log_level.as_deref())?;

    // Each arm gets its own builder so both layers bind to their own subscriber type
    let full = (config.format == LogFormat::Full).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_target(true)
    });
    let compact = (config.format == LogFormat::Compact).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_target(true)
    });

    Ok(Registry::default().with(env_filter).with(full).with(compact))
}

/// Initialize with configuration from environment variables
pub fn init_from_env() -> Result<(), ObservabilityError> {
    init(ObservabilityConfig::from_env())
}

fn build_filter(level: Option<&str>) -> Result<EnvFilter, ObservabilityError> {
    match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| ObservabilityError::Config(format!("invalid log level '{}': {}", directive, e))),
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_directives() {
        assert!(build_filter(Some("debug")).is_ok());
        assert!(build_filter(Some("chatbridge_runtime=trace,warn")).is_ok());
        assert!(build_filter(None).is_ok());
    }

    #[test]
    fn test_subscriber_builds_for_every_format() {
        for format in [LogFormat::Full, LogFormat::Compact] {
            let config = ObservabilityConfig::new("test")
                .with_log_level("debug")
                .with_ansi(false)
                .with_format(format);
            let subscriber = build_subscriber(&config).unwrap();

            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(format = ?format, "subscriber active");
                assert!(tracing::enabled!(tracing::Level::DEBUG));
                assert!(!tracing::enabled!(tracing::Level::TRACE));
            });
        }
    }

    #[test]
    fn test_subscriber_rejects_bad_level() {
        let config = ObservabilityConfig::new("test").with_log_level("chatbridge=notalevel");
        assert!(build_subscriber(&config).is_err());
    }

    #[test]
    fn test_filter_rejects_garbage() {
        let err = build_filter(Some("chatbridge=notalevel")).unwrap_err();
        assert!(matches!(err, ObservabilityError::Config(_)));
    }
}
