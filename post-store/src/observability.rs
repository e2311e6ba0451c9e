//! Tracing setup

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Build the filter for a configured level, falling back to `info`
pub fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a JSON tracing subscriber.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_tracing(config: &LogConfig) -> bool {
    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(log_filter(&config.level))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(level = %config.level, "Tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_falls_back_on_garbage() {
        assert_eq!(log_filter("debug").to_string(), "debug");
        assert_eq!(log_filter("post_store=trace").to_string(), "post_store=trace");
        assert_eq!(log_filter("post_store=loud").to_string(), "info");
    }

    #[test]
    fn test_init_tracing_twice_keeps_first() {
        let config = LogConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
