use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// Settings for the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[non_exhaustive]
pub struct TracingConfig {
    pub max_level: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            max_level: "INFO".to_string(),
        }
    }
}

/// Logging severity, also used to pick the output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Log,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Debug,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Log => "log",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Debug => "debug",
        }
    }

    /// Position of this severity in [`Severity::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How object and array messages are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerMode {
    /// Objects and arrays are inspected in their entirety.
    #[default]
    Auto,
    /// Every message is written next to its prefix as-is.
    Simple,
}

/// Display prefix for every severity.
///
/// A prefix map always carries all five entries, so overriding it replaces
/// the default map as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Prefixes {
    pub info: Cow<'static, str>,
    pub error: Cow<'static, str>,
    pub warn: Cow<'static, str>,
    pub log: Cow<'static, str>,
    pub debug: Cow<'static, str>,
}

impl Prefixes {
    pub const DEFAULT: Prefixes = Prefixes {
        info: Cow::Borrowed("Info:    "),
        error: Cow::Borrowed("Error:   "),
        warn: Cow::Borrowed("Warning: "),
        log: Cow::Borrowed("Log:     "),
        debug: Cow::Borrowed("Debug:   "),
    };

    pub fn get(&self, severity: Severity) -> &str {
        match severity {
            Severity::Log => &self.log,
            Severity::Info => &self.info,
            Severity::Warn => &self.warn,
            Severity::Error => &self.error,
            Severity::Debug => &self.debug,
        }
    }
}

impl Default for Prefixes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Caller-supplied console logger settings. Every omitted field falls back
/// to [`DEFAULT_CONFIG`] when resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub mode: Option<LoggerMode>,
    /// Handle `warn` calls exactly like `error` calls.
    #[serde(alias = "warningsAsErrors")]
    pub warnings_as_errors: Option<bool>,
    /// Fail `error` calls after the entry is written.
    #[serde(alias = "throwOnError")]
    pub throw_on_error: Option<bool>,
    #[serde(alias = "hideDebug")]
    pub hide_debug: Option<bool>,
    #[serde(alias = "hideLogs")]
    pub hide_logs: Option<bool>,
    pub prefixes: Option<Prefixes>,
    /// Blank lines after each entry. Zero or negative inserts none.
    pub spacing: Option<i64>,
}

impl LoggerConfig {
    /// Shallow merge over [`DEFAULT_CONFIG`].
    pub fn resolve(self) -> ResolvedConfig {
        let defaults = DEFAULT_CONFIG;
        ResolvedConfig {
            mode: self.mode.unwrap_or(defaults.mode),
            warnings_as_errors: self
                .warnings_as_errors
                .unwrap_or(defaults.warnings_as_errors),
            throw_on_error: self.throw_on_error.unwrap_or(defaults.throw_on_error),
            hide_debug: self.hide_debug.unwrap_or(defaults.hide_debug),
            hide_logs: self.hide_logs.unwrap_or(defaults.hide_logs),
            prefixes: self.prefixes.unwrap_or(defaults.prefixes),
            spacing: self.spacing.unwrap_or(defaults.spacing),
        }
    }
}

/// Console logger settings with every field materialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[non_exhaustive]
pub struct ResolvedConfig {
    pub mode: LoggerMode,
    pub warnings_as_errors: bool,
    pub throw_on_error: bool,
    pub hide_debug: bool,
    pub hide_logs: bool,
    pub prefixes: Prefixes,
    pub spacing: i64,
}

pub const DEFAULT_CONFIG: ResolvedConfig = ResolvedConfig {
    mode: LoggerMode::Auto,
    warnings_as_errors: false,
    throw_on_error: false,
    hide_debug: false,
    hide_logs: false,
    prefixes: Prefixes::DEFAULT,
    spacing: 0,
};

impl Default for ResolvedConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl From<LoggerConfig> for ResolvedConfig {
    fn from(config: LoggerConfig) -> Self {
        config.resolve()
    }
}
