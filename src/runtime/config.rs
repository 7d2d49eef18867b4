use std::env;

use serde::Deserialize;
use thiserror::Error;

pub const TRACE_CALLS_ENV: &str = "CALLCORE_TRACE_CALLS";
pub const CALL_LOOP_LIMIT_ENV: &str = "CALLCORE_CALL_LOOP_LIMIT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid runtime config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Dispatcher settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Emit a trace event for every dispatched application.
    pub trace_calls: bool,
    /// Upper bound on tail calls resolved by one call loop. `None` means
    /// unbounded.
    pub call_loop_limit: Option<u64>,
}

impl RuntimeConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads `CALLCORE_TRACE_CALLS` and `CALLCORE_CALL_LOOP_LIMIT` from the
    /// process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(TRACE_CALLS_ENV) {
            let enabled = match value.trim() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" | "" => Some(false),
                _ => None,
            };
            config.trace_calls = enabled.ok_or(ConfigError::InvalidEnv {
                name: TRACE_CALLS_ENV,
                value,
            })?;
        }
        if let Some(value) = lookup(CALL_LOOP_LIMIT_ENV) {
            let limit = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv {
                    name: CALL_LOOP_LIMIT_ENV,
                    value: value.clone(),
                })?;
            config.call_loop_limit = Some(limit);
        }
        Ok(config)
    }
}
