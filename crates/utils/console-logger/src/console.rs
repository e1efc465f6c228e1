use crate::{
    error::{LoggedError, LoggedResult},
    message::Message,
    output::{Output, StdConsole},
};
use config_loader::logging::{LoggerConfig, LoggerMode, ResolvedConfig, Severity};
use serde::Serialize;
use tracing::Level;
use std::{borrow::Cow, fmt, sync::Arc};

/// Upper bound on blank lines emitted after an entry.
pub const MAX_SPACING: usize = u16::MAX as usize;

/// What a call at one severity actually does. Bound once per logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Behavior {
    /// Severity whose prefix and output channel are used.
    channel: Severity,
    suppressed: bool,
    fails: bool,
}

impl Behavior {
    fn bind(severity: Severity, config: &ResolvedConfig) -> Self {
        match severity {
            Severity::Warn if config.warnings_as_errors => Self::bind(Severity::Error, config),
            Severity::Log => Self::new(severity, config.hide_logs, false),
            Severity::Debug => Self::new(severity, config.hide_debug, false),
            Severity::Error => Self::new(severity, false, config.throw_on_error),
            Severity::Info | Severity::Warn => Self::new(severity, false, false),
        }
    }

    fn new(channel: Severity, suppressed: bool, fails: bool) -> Self {
        Self {
            channel,
            suppressed,
            fails,
        }
    }
}

/// Console logger with per-severity suppression and escalation policies.
///
/// # Examples
///
/// ```
/// use console_logger::{LoggerConfig, create_logger};
///
/// let logger = create_logger(Some(LoggerConfig {
///     spacing: Some(1),
///     throw_on_error: Some(true),
///     ..Default::default()
/// }));
///
/// logger.log("hello world", Some("my log title"));
/// assert!(logger.error("fatal", None).is_err());
/// ```
#[derive(Clone)]
pub struct Logger {
    config: ResolvedConfig,
    behaviors: [Behavior; 5],
    spacer: String,
    output: Arc<dyn Output>,
}

/// Build a logger writing to the standard streams.
pub fn create_logger(config: Option<LoggerConfig>) -> Logger {
    Logger::new(config.unwrap_or_default())
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_output(config, Arc::new(StdConsole))
    }

    pub fn with_output(config: LoggerConfig, output: Arc<dyn Output>) -> Self {
        let config = config.resolve();
        let behaviors = Severity::ALL.map(|severity| Behavior::bind(severity, &config));
        let spacer = spacer(config.spacing);
        Self {
            config,
            behaviors,
            spacer,
            output,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Suppressed when `hide_logs` is set.
    pub fn log<M: Serialize + ?Sized>(&self, message: &M, name: Option<&str>) {
        self.write_entry(Severity::Log, &Message::capture(message), name);
    }

    pub fn info<M: Serialize + ?Sized>(&self, message: &M, name: Option<&str>) {
        self.write_entry(Severity::Info, &Message::capture(message), name);
    }

    /// Handled exactly like [`Logger::error`] when `warnings_as_errors` is set.
    pub fn warn<M: Serialize + ?Sized>(&self, message: &M, name: Option<&str>) -> LoggedResult<()> {
        self.emit(Severity::Warn, message, name)
    }

    /// Fails with the stringified message after logging when
    /// `throw_on_error` is set.
    pub fn error<M: Serialize + ?Sized>(&self, message: &M, name: Option<&str>) -> LoggedResult<()> {
        self.emit(Severity::Error, message, name)
    }

    /// Suppressed when `hide_debug` is set. Also writes the message's type.
    pub fn debug<M: Serialize + ?Sized>(&self, message: &M, name: Option<&str>) {
        self.write_entry(Severity::Debug, &Message::capture(message), name);
    }

    /// Log at a severity chosen at runtime.
    pub fn emit<M: Serialize + ?Sized>(
        &self,
        severity: Severity,
        message: &M,
        name: Option<&str>,
    ) -> LoggedResult<()> {
        let message = Message::capture(message);
        if self.write_entry(severity, &message, name).fails {
            return Err(LoggedError::new(message.stringify()));
        }
        Ok(())
    }

    fn write_entry(&self, severity: Severity, message: &Message, name: Option<&str>) -> Behavior {
        let behavior = self.behaviors[severity.index()];
        if behavior.suppressed {
            return behavior;
        }

        let channel = behavior.channel;
        if !self.output.has_channel(channel) {
            return behavior;
        }

        let prefix = self.prefix(channel, name);
        if self.config.mode == LoggerMode::Auto && message.is_structured() {
            self.output.write(channel, &[&*prefix]);
            // only the prefix reaches the channel for structured values
            if tracing::enabled!(Level::TRACE) {
                let inspected = message.inspect();
                tracing::trace!(severity = channel.as_str(), %inspected, "structured message");
            }
        } else {
            let rendered = message.render();
            self.output.write(channel, &[&*prefix, rendered.as_str()]);
        }

        if channel == Severity::Debug {
            let type_info = format!("( {} )", message.type_descriptor());
            self.output.write(channel, &[type_info.as_str(), self.spacer.as_str()]);
        } else {
            self.output.write(channel, &[self.spacer.as_str()]);
        }

        behavior
    }

    fn prefix(&self, severity: Severity, name: Option<&str>) -> Cow<'_, str> {
        let prefix = self.config.prefixes.get(severity);
        match name.filter(|name| !name.is_empty()) {
            Some(name) => Cow::Owned(format!("[{}] {}:", prefix.replace(':', "").trim(), name)),
            None => Cow::Borrowed(prefix),
        }
    }
}

/// `spacing` newlines, none for zero or negative, at most [`MAX_SPACING`].
fn spacer(spacing: i64) -> String {
    usize::try_from(spacing)
        .ok()
        .map(|count| "\n".repeat(count.min(MAX_SPACING)))
        .unwrap_or_default()
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
