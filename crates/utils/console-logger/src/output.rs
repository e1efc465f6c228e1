use config_loader::logging::Severity;
use std::io::Write;

/// Destination for the text of each severity.
///
/// One `write` call corresponds to one console call: the arguments are
/// joined with a single space and end with a newline.
pub trait Output: Send + Sync {
    /// Whether this output exposes a channel for `severity`. Writes to a
    /// missing channel are never attempted.
    fn has_channel(&self, _severity: Severity) -> bool {
        true
    }

    fn write(&self, severity: Severity, args: &[&str]);
}

/// Standard streams: `warn` and `error` go to stderr, everything else to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Output for StdConsole {
    fn write(&self, severity: Severity, args: &[&str]) {
        let line = args.join(" ");
        // console writes never fail the caller
        let _ = match severity {
            Severity::Warn | Severity::Error => writeln!(std::io::stderr().lock(), "{line}"),
            Severity::Log | Severity::Info | Severity::Debug => {
                writeln!(std::io::stdout().lock(), "{line}")
            }
        };
    }
}

/// Routes console writes into `tracing` events on the `console` target.
///
/// Spacer writes with no visible text are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOutput;

impl Output for TracingOutput {
    fn write(&self, severity: Severity, args: &[&str]) {
        let line = args.join(" ");
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }

        match severity {
            Severity::Log | Severity::Info => {
                tracing::info!(target: "console", severity = severity.as_str(), "{line}")
            }
            Severity::Warn => tracing::warn!(target: "console", "{line}"),
            Severity::Error => tracing::error!(target: "console", "{line}"),
            Severity::Debug => tracing::debug!(target: "console", "{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_console_exposes_every_channel() {
        for severity in Severity::ALL {
            assert!(StdConsole.has_channel(severity));
        }
        // writing without a subscriber or terminal must not panic
        StdConsole.write(Severity::Info, &["Info:    ", "hello"]);
        StdConsole.write(Severity::Error, &[""]);
    }

    #[test]
    fn test_tracing_output_levels_and_target() {
        let captured = testing::capture_events(|| {
            TracingOutput.write(Severity::Log, &["Log:     ", "from log"]);
            TracingOutput.write(Severity::Info, &["Info:    ", "from info"]);
            TracingOutput.write(Severity::Warn, &["Warning: ", "from warn"]);
            TracingOutput.write(Severity::Error, &["Error:   ", "from error"]);
            TracingOutput.write(Severity::Debug, &["( string )", ""]);
        });

        let lines: Vec<&str> = captured.lines().collect();
        assert_eq!(lines.len(), 5, "{captured}");
        let expected = [
            ("INFO", "from log"),
            ("INFO", "from info"),
            ("WARN", "from warn"),
            ("ERROR", "from error"),
            ("DEBUG", "( string )"),
        ];
        for (line, (level, text)) in lines.iter().zip(expected) {
            assert!(line.contains(level), "{line}");
            assert!(line.contains("console:"), "{line}");
            assert!(line.contains(text), "{line}");
        }
        assert!(lines[0].contains("severity=\"log\""));
        assert!(lines[1].contains("severity=\"info\""));
    }

    #[test]
    fn test_tracing_output_skips_blank_writes() {
        let captured = testing::capture_events(|| {
            TracingOutput.write(Severity::Warn, &["\n\n"]);
            TracingOutput.write(Severity::Info, &[""]);
            TracingOutput.write(Severity::Error, &["", ""]);
        });
        assert!(captured.is_empty(), "{captured}");
    }
}
