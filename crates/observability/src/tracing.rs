//! Span helpers

/// Create a span for one editor invocation
///
/// # Example
///
/// ```rust
/// use chatbridge_observability::invocation_span;
///
/// let span = invocation_span!("anthropic/claude-sonnet-4", "contextual");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! invocation_span {
    ($model:expr, $route:expr) => {
        tracing::info_span!(
            "chatbridge.invocation",
            model = $model,
            route = $route,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span
///
/// The span must declare `error` and `error.message` fields for the values
/// to be kept; the error is always logged.
///
/// # Example
///
/// ```rust
/// use chatbridge_observability::record_error;
///
/// let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "host went away");
/// record_error(&err);
/// ```
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "Operation failed");
}

/// Record a duration in milliseconds on the current span
///
/// # Example
///
/// ```rust
/// use chatbridge_observability::record_duration;
/// use std::time::Instant;
///
/// let start = Instant::now();
/// record_duration("bridge.stream_duration_ms", start.elapsed());
/// ```
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration_millis(duration));
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn duration_millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_duration_millis() {
        assert_eq!(duration_millis(Duration::from_micros(2_500)), 2);
        assert_eq!(duration_millis(Duration::from_secs(3)), 3_000);
    }

    #[test]
    fn test_duration_millis_saturates() {
        assert_eq!(duration_millis(Duration::MAX), u64::MAX);
    }
}
