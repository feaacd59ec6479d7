//! Tracing subscriber setup
//!
//! The engine only emits events, under the `blockreplace_core` and
//! `blockreplace_tree` targets. Hosts running their own subscriber never call
//! into this module; standalone hosts and test harnesses use [`init`] or
//! [`init_for_tests`].

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Filter used when neither `RUST_LOG` nor `log_filter` is set.
pub const DEFAULT_DIRECTIVES: &str = "blockreplace_core=info,blockreplace_tree=warn";

/// Parse filter directives, falling back to [`DEFAULT_DIRECTIVES`].
pub fn filter(directives: Option<&str>) -> Result<EnvFilter> {
    let directives = directives.unwrap_or(DEFAULT_DIRECTIVES);
    EnvFilter::try_new(directives).map_err(|e| Error::Logging {
        message: format!("invalid filter '{directives}': {e}"),
    })
}

/// Install a global subscriber writing pass summaries and warnings to stdout.
///
/// `RUST_LOG` wins over `config.log_filter`. Fails if a global subscriber is
/// already set.
pub fn init(config: &EngineConfig) -> Result<()> {
    install(config, false)
}

/// Like [`init`], but writes through the test harness so output is captured.
pub fn init_for_tests(config: &EngineConfig) -> Result<()> {
    install(config, true)
}

fn install(config: &EngineConfig, test_writer: bool) -> Result<()> {
    let filter_layer = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter(config.log_filter.as_deref())?,
    };

    let fmt_layer = fmt::layer().with_target(true).without_time().compact();
    let registry = tracing_subscriber::registry().with(filter_layer);
    let installed = if test_writer {
        registry.with(fmt_layer.with_test_writer()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };

    installed.map_err(|e| Error::Logging {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_filter_parses() {
        assert!(filter(None).is_ok());
    }

    #[rstest]
    #[case("debug")]
    #[case("blockreplace_core=trace,blockreplace_tree=debug")]
    fn test_custom_filters_parse(#[case] directives: &str) {
        assert!(filter(Some(directives)).is_ok());
    }

    #[test]
    fn test_bad_level_is_logging_error() {
        let result = filter(Some("blockreplace_core=loud"));
        assert!(matches!(result, Err(Error::Logging { .. })));
    }

    #[test]
    fn test_second_install_fails() {
        let config = EngineConfig::default();
        // Another test may have installed the subscriber first.
        let _ = init_for_tests(&config);
        assert!(matches!(init_for_tests(&config), Err(Error::Logging { .. })));
    }
}
