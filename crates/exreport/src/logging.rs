//! Tracing setup for the CLI
//!
//! Logs go to stderr so a report printed on stdout can be piped as is.

use tracing_subscriber::EnvFilter;

/// Filter directive for a run: `RUST_LOG` wins, then verbose, then config
pub fn filter_directive(config_level: &str, verbose: bool) -> String {
    if let Ok(directive) = std::env::var("RUST_LOG") {
        if !directive.is_empty() {
            return directive;
        }
    }
    if verbose {
        "debug".to_string()
    } else {
        config_level.to_string()
    }
}

pub fn init(config_level: &str, verbose: bool) {
    let filter = EnvFilter::try_new(filter_directive(config_level, verbose))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    use exreport_common::config::LogConfig;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_verbose_raises_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert_eq!(filter_directive("warn", false), "warn");
        assert_eq!(filter_directive("warn", true), "debug");
    }

    #[test]
    fn test_default_level_hides_progress() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let level = LogConfig::default().level;

        let quiet = EnvFilter::new(filter_directive(&level, false));
        assert_eq!(quiet.max_level_hint(), Some(LevelFilter::WARN));

        let verbose = EnvFilter::new(filter_directive(&level, true));
        assert_eq!(verbose.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
