//! chatbridge observability: log setup and span helpers.
//!
//! stdout belongs to the host protocol, so every log line goes to stderr.
//!
//! # Quick Start
//!
//! ```no_run
//! use chatbridge_observability::{init, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("chatbridge").with_log_level("debug");
//! init(config)?;
//!
//! // Or from environment variables
//! // chatbridge_observability::init_from_env()?;
//!
//! tracing::info!("bridge started");
//! # Ok::<(), chatbridge_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `CHATBRIDGE_SERVICE_NAME` - Service name attached to the root span
//! - `CHATBRIDGE_LOG` or `RUST_LOG` - Log level filter
//! - `NO_COLOR` - Disable ANSI colors

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env};
pub use tracing::{duration_millis, record_duration, record_error};
