//! File-backed tracing setup.
//!
//! Stdout is the UI, so log output never goes to the terminal. Nothing is installed unless the
//! caller asks for a log file.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::EnvConfig;

/// Whether `REENTER_DEBUG_REDRAW=1` was set when first asked.
pub fn debug_redraw_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| EnvConfig::from_env().debug_redraw)
}

/// Install the global subscriber writing to `path` (truncated).
///
/// Filtering follows `RUST_LOG` when set, `debug` otherwise.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let log_file = File::create(path)?;
    build_subscriber(log_file, default_filter())
        .try_init()
        .map_err(|err| io::Error::other(format!("tracing subscriber already set: {err}")))
}

pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
}

/// Subscriber configuration shared between the binary and tests.
pub fn build_subscriber(
    log_file: File,
    env_filter: EnvFilter,
) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}

#[cfg(test)]
mod tests {
    use super::build_subscriber;
    use tempfile::NamedTempFile;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn subscriber_writes_plain_text_to_file() {
        let log_file = NamedTempFile::new().expect("temp log");
        let subscriber = build_subscriber(log_file.reopen().expect("reopen"), EnvFilter::new("debug"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(extent = 3, "redraw");
        });

        let contents = std::fs::read_to_string(log_file.path()).expect("read log");
        assert!(contents.contains("redraw"), "log: {contents}");
        assert!(contents.contains("extent=3"), "log: {contents}");
        assert!(!contents.contains('\x1b'), "log must not carry ANSI codes");
    }
}
