#![forbid(unsafe_code)]

//! Structured logging glue.
//!
//! The crate logs through `tracing`. Dispatch lines are emitted at `trace`
//! level when [`ReactiveVecConfig::trace_events`](crate::ReactiveVecConfig)
//! is set; the subscriber-leak warning uses `warn`.
//!
//! With the `tracing-json` feature, [`try_init`] installs a JSON formatter
//! filtered by `RUST_LOG` (falling back to the given default directive).

pub use tracing::{debug, error, info, trace, warn};

use std::fmt;

/// A global subscriber could not be installed.
#[derive(Debug, Clone)]
pub struct LoggingInitError {
    message: String,
}

impl fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.message)
    }
}

impl std::error::Error for LoggingInitError {}

/// Install a JSON `tracing` subscriber for the process.
///
/// `default_filter` is used when `RUST_LOG` is unset or invalid, e.g.
/// `"rvec_core=trace"`. Fails if a global subscriber already exists.
#[cfg(feature = "tracing-json")]
pub fn try_init(default_filter: &str) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| LoggingInitError {
            message: err.to_string(),
        })
}
