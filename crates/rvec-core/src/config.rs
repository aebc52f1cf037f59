#![forbid(unsafe_code)]

//! Runtime configuration for sequences and emitters.
//!
//! Values come from [`ReactiveVecConfig::default`] and may be overridden by
//! environment variables. Bad values never abort: they keep the default and
//! are reported through [`ConfigParse::errors`].

use std::env;
use std::fmt;

const ENV_INITIAL_CAPACITY: &str = "RVEC_INITIAL_CAPACITY";
const ENV_TRACE_EVENTS: &str = "RVEC_TRACE_EVENTS";
const ENV_SUBSCRIBER_WARN_THRESHOLD: &str = "RVEC_SUBSCRIBER_WARN_THRESHOLD";

/// Sequence and emitter configuration (env-overridable).
///
/// # Environment Variables
/// - `RVEC_INITIAL_CAPACITY` (usize)
/// - `RVEC_TRACE_EVENTS` (bool)
/// - `RVEC_SUBSCRIBER_WARN_THRESHOLD` (usize, > 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactiveVecConfig {
    /// Capacity reserved by [`ReactiveVec::with_config`](crate::ReactiveVec::with_config).
    pub initial_capacity: usize,
    /// Log a `trace!` line for every dispatched event.
    pub trace_events: bool,
    /// Subscriber count above which the emitter warns about leaked guards.
    pub subscriber_warn_threshold: usize,
}

impl Default for ReactiveVecConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            trace_events: false,
            subscriber_warn_threshold: 64,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: ReactiveVecConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ReactiveVecConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> ReactiveVecConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.subscriber_warn_threshold == 0 {
            errors.push(ConfigError::new(
                "subscriber_warn_threshold",
                "0",
                "must be greater than zero",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = ReactiveVecConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_INITIAL_CAPACITY) {
        match parse_usize(&value) {
            Some(parsed) => config.initial_capacity = parsed,
            None => errors.push(ConfigError::new(
                "initial_capacity",
                value,
                "expected non-negative integer",
            )),
        }
    }

    if let Some(value) = get(ENV_TRACE_EVENTS) {
        match parse_bool(&value) {
            Some(parsed) => config.trace_events = parsed,
            None => errors.push(ConfigError::new(
                "trace_events",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_SUBSCRIBER_WARN_THRESHOLD) {
        match parse_usize(&value).filter(|n| *n > 0) {
            Some(parsed) => config.subscriber_warn_threshold = parsed,
            None => errors.push(ConfigError::new(
                "subscriber_warn_threshold",
                value,
                "expected positive integer",
            )),
        }
    }

    ConfigParse { config, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}
