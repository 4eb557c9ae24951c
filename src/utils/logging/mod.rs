//! Console logging for the slimmer.
//!
//! Messages go through [`CleanFormatter`], which groups them into a shallow
//! hierarchy (file, stage, step, detail) instead of printing targets and
//! levels on every line.

mod formatter;
mod helpers;

pub use helpers::{log_noop_skip, log_plan, log_slim_complete, log_slim_start};

use crate::utils::{Error, Result};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use formatter::CleanFormatter;

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `level`.
///
/// ```no_run
/// use video_slimmer::utils::logging::setup_logging;
///
/// setup_logging("info", false, true).expect("Failed to setup logging");
/// ```
pub fn setup_logging(level: &str, show_timestamps: bool, colored: bool) -> Result<()> {
    let level = parse_level(level).unwrap_or(Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(false)
        .event_format(CleanFormatter::new(show_timestamps, colored));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::validation(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("warn"), Some(Level::WARN));
        assert_eq!(parse_level("verbose"), None);
        assert!(LOG_LEVELS.iter().all(|level| parse_level(level).is_some()));
    }
}
