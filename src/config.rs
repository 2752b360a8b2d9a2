//! Runtime configuration.
//!
//! Settings can be configured via:
//! - CLI arguments: `--no-handler`, `run --step-ms`
//! - Environment variables: `CANCEL_BUS_HANDLER_ACTIVE`, `CANCEL_BUS_STEP_MS`
//!
//! CLI arguments take precedence over environment variables.

use std::env;
use std::time::Duration;

use log::warn;

pub const HANDLER_ACTIVE_VAR: &str = "CANCEL_BUS_HANDLER_ACTIVE";
pub const STEP_MS_VAR: &str = "CANCEL_BUS_STEP_MS";

const DEFAULT_STEP_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether Ctrl+C opens the interactive menu or exits right away.
    pub handler_active: bool,
    /// Delay between steps of the demo computation.
    pub step_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            handler_active: true,
            step_delay: Duration::from_millis(DEFAULT_STEP_MS),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Invalid values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(HANDLER_ACTIVE_VAR) {
            match parse_bool(&value) {
                Some(active) => config.handler_active = active,
                None => warn!("Invalid boolean '{}' in {}", value, HANDLER_ACTIVE_VAR),
            }
        }

        if let Some(value) = lookup(STEP_MS_VAR) {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.step_delay = Duration::from_millis(ms),
                Err(_) => warn!("Invalid milliseconds '{}' in {}", value, STEP_MS_VAR),
            }
        }

        config
    }

    /// Merge with CLI overrides. CLI values take precedence.
    pub fn with_overrides(mut self, handler_active: Option<bool>, step_ms: Option<u64>) -> Self {
        if let Some(active) = handler_active {
            self.handler_active = active;
        }
        if let Some(ms) = step_ms {
            self.step_delay = Duration::from_millis(ms);
        }
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
