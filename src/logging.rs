//! logging
//!
//! Diagnostic output via `tracing`, always on stderr so command output on
//! stdout stays machine readable.
//!
//! Filter precedence (highest first):
//! 1. `SNAPLINE_LOG` environment variable (full `EnvFilter` syntax)
//! 2. `--debug`
//! 3. `log_level` from the config file
//! 4. `warn`

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "SNAPLINE_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Level used when `SNAPLINE_LOG` is not set.
pub fn default_directive(debug: bool, config_level: Option<&str>) -> &str {
    if debug {
        "debug"
    } else {
        config_level.unwrap_or(DEFAULT_LEVEL)
    }
}

fn build_env_filter(debug: bool, config_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug, config_level)))
}

/// Install the global subscriber.
///
/// A second call is a no-op, so tests and the shell's nested commands can
/// call it freely.
pub fn init_logging(debug: bool, config_level: Option<&str>) {
    let filter = build_env_filter(debug, config_level);
    let _ = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(debug)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_wins_over_config() {
        assert_eq!(default_directive(true, Some("error")), "debug");
    }

    #[test]
    fn config_level_used_without_flag() {
        assert_eq!(default_directive(false, Some("info")), "info");
    }

    #[test]
    fn falls_back_to_warn() {
        assert_eq!(default_directive(false, None), "warn");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(false, None);
        init_logging(true, Some("trace"));
    }
}
