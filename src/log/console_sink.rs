use std::io::{self, Write};

use crate::log::{log_sink::LogSink, severity::Severity};

/// Writes `"<letter>/<tag>: <line>"` to the terminal.
///
/// `Warn` and `Error` go to stderr, everything else to stdout. A multi-line
/// message (an attached call stack, for instance) is written one prefixed
/// line per source line so the output stays greppable by tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    fn write_to<W: Write>(out: &mut W, severity: Severity, tag: &str, message: &str) {
        for line in prefixed_lines(severity, tag, message) {
            // A closed pipe must not take the caller down with it.
            let _ = writeln!(out, "{line}");
        }
    }
}

impl LogSink for ConsoleSink {
    fn emit(&self, severity: Severity, tag: &str, message: &str) {
        if severity >= Severity::Warn {
            Self::write_to(&mut io::stderr().lock(), severity, tag, message);
        } else {
            Self::write_to(&mut io::stdout().lock(), severity, tag, message);
        }
    }
}

fn prefixed_lines<'a>(
    severity: Severity,
    tag: &'a str,
    message: &'a str,
) -> impl Iterator<Item = String> + 'a {
    let letter = severity.letter();
    let mut lines: Vec<&str> = message.lines().collect();
    if lines.is_empty() {
        lines.push("");
    }
    lines
        .into_iter()
        .map(move |line| format!("{letter}/{tag}: {line}"))
}
