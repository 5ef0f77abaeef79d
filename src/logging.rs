//! Logging setup
//!
//! Console output through `tracing-subscriber`. The filter comes from
//! `RUST_LOG` when set, otherwise from the configured directive.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Directive forced by `--verbose`
pub const VERBOSE_FILTER: &str = "debug";

/// Picks the filter directive: verbose wins, then RUST_LOG, then `configured`.
pub fn filter_directive(configured: &str, verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return VERBOSE_FILTER.to_string();
    }
    match rust_log {
        Some(env) if !env.trim().is_empty() => env.to_string(),
        _ => configured.to_string(),
    }
}

/// Installs the global subscriber.
///
/// Returns false when one is already installed (tests, embedding), in which
/// case the existing subscriber is kept.
pub fn init(configured: &str, verbose: bool) -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(configured, verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_everything() {
        assert_eq!(filter_directive("warn", true, Some("error")), "debug");
    }

    #[test]
    fn test_env_overrides_config() {
        assert_eq!(filter_directive("info", false, Some("geodb=trace")), "geodb=trace");
        assert_eq!(filter_directive("info", false, Some("  ")), "info");
        assert_eq!(filter_directive("warn", false, None), "warn");
    }

    #[test]
    fn test_second_init_is_tolerated() {
        init("info", false);
        assert!(!init("info", false));
    }
}
