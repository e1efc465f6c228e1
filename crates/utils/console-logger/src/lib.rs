pub mod console;
pub mod error;
pub mod message;
pub mod output;
pub mod util;
pub use crate::console::{Logger, create_logger};
pub use crate::error::{LoggedError, LoggedResult, LoggingError};
pub use crate::message::Message;
pub use crate::output::{Output, StdConsole, TracingOutput};
pub use crate::util::{utc_offset_hms, utc_offset_hours};
use config_loader::{app_config::BaseAppConfig, logging::TracingConfig};
pub use config_loader::logging::{
    DEFAULT_CONFIG, LoggerConfig, LoggerMode, Prefixes, ResolvedConfig, Severity,
};
pub use time::UtcOffset;
use time::{format_description::BorrowedFormatItem, macros::format_description};
pub use tracing::{Level, debug, error, info, trace, warn};
use tracing_subscriber::{
    EnvFilter, Registry, filter::Directive, fmt::time::OffsetTime, layer::SubscriberExt,
};

pub struct LoggingGuard {
    #[cfg(feature = "stdout")]
    /// Keep stdout guard alive to ensure all logs are flushed
    pub stdout_guard: tracing_appender::non_blocking::WorkerGuard,
}

fn parse_directives(directives: Option<Vec<&str>>) -> Result<Vec<Directive>, LoggingError> {
    directives
        .unwrap_or_default()
        .into_iter()
        .map(|dir| {
            dir.parse::<Directive>()
                .map_err(|e| LoggingError::InvalidDirective {
                    directive: dir.to_string(),
                    message: e.to_string(),
                })
        })
        .collect()
}

/// Install the global `tracing` subscriber used for diagnostics and by
/// [`TracingOutput`].
pub fn setup_logging(
    app_config: BaseAppConfig,
    tracing_config: TracingConfig,
    env_filter_override: Option<Vec<&str>>,
) -> Result<LoggingGuard, LoggingError> {
    let directives = parse_directives(env_filter_override)?;

    let timezone = match app_config.timezone {
        Some(offset) => utc_offset_hours(offset)?,
        None => UtcOffset::UTC,
    };

    let fmt: &[BorrowedFormatItem<'_>] = if cfg!(debug_assertions) {
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]")
    } else {
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]")
    };
    let timer = OffsetTime::new(timezone, fmt);

    let max_level = tracing_config
        .max_level
        .parse::<Level>()
        .unwrap_or(Level::INFO);

    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    for directive in directives {
        env_filter = env_filter.add_directive(directive);
    }

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(max_level);

    let registry = Registry::default().with(env_filter).with(level_filter);

    #[cfg(feature = "stdout")]
    let (registry, stdout_guard) = {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());

        let console_layer = tracing_subscriber::fmt::Layer::default()
            .with_writer(non_blocking)
            .with_timer(timer)
            .with_ansi(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        (registry.with(console_layer), guard)
    };

    #[cfg(not(feature = "stdout"))]
    let registry = {
        let console_layer = tracing_subscriber::fmt::Layer::default()
            .with_writer(std::io::stdout)
            .with_timer(timer)
            .with_target(true);
        registry.with(console_layer)
    };

    if tracing::dispatcher::has_been_set() {
        warn!(app = %app_config.name, "Global trace dispatcher already set, skipping re-init");
    } else {
        tracing::subscriber::set_global_default(registry).map_err(|e| {
            LoggingError::BuildLayerError {
                message: e.to_string(),
                context: "init",
            }
        })?;
    }

    Ok(LoggingGuard {
        #[cfg(feature = "stdout")]
        stdout_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives_rejects_invalid_level() {
        let result = parse_directives(Some(vec!["my_app=loudest"]));
        assert!(matches!(
            result,
            Err(LoggingError::InvalidDirective { ref directive, .. }) if directive == "my_app=loudest"
        ));
    }

    #[test]
    fn test_parse_directives_accepts_valid() {
        let directives = parse_directives(Some(vec!["my_app=debug", "hyper=warn"])).unwrap();
        assert_eq!(directives.len(), 2);
        assert!(parse_directives(None).unwrap().is_empty());
    }

    #[test]
    fn test_setup_logging_rejects_bad_timezone() {
        let app = BaseAppConfig::new("console-logger").with_timezone(40);
        let result = setup_logging(app, TracingConfig::default(), None);
        assert!(matches!(result, Err(LoggingError::InvalidTimezone(_))));
    }

    #[test]
    fn test_setup_logging_then_tracing_output() {
        let app = BaseAppConfig::new("console-logger").with_timezone(7);
        let guard = setup_logging(app, TracingConfig::default(), Some(vec!["console=debug"]));
        assert!(guard.is_ok());

        let logger = Logger::with_output(LoggerConfig::default(), std::sync::Arc::new(TracingOutput));
        logger.info("routed through tracing", Some("Setup"));
        assert!(logger.error("still ok", None).is_ok());
    }
}
