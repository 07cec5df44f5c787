//! Environment configuration.

use std::env;
use std::time::Duration;

/// Default interval between overlay redraws.
pub const DEFAULT_TICK_MS: u64 = 400;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// `REENTER_WRITE_LOG`: append every terminal write to this file.
    pub write_log: Option<String>,
    /// `REENTER_DEBUG_REDRAW=1`: log redraw bookkeeping at debug level.
    pub debug_redraw: bool,
    /// `REENTER_LOG`: tracing log file.
    pub log_file: Option<String>,
    /// `REENTER_TICK_MS`: overlay tick interval override.
    pub tick_ms: Option<u64>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            write_log: env_string_opt("REENTER_WRITE_LOG"),
            debug_redraw: env_flag("REENTER_DEBUG_REDRAW"),
            log_file: env_string_opt("REENTER_LOG"),
            tick_ms: env_string_opt("REENTER_TICK_MS").and_then(|value| value.trim().parse().ok()),
        }
    }

    /// Overlay tick interval, never zero.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.unwrap_or(DEFAULT_TICK_MS).max(1))
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
