use crate::log::severity::Severity;

/// Where formatted lines end up.
///
/// The facade calls `emit` once per line: once for the message and, when an
/// attachment rendered to something non-empty, once more for that block.
/// Implementations are expected to return promptly.
pub trait LogSink: Send + Sync {
    fn emit(&self, severity: Severity, tag: &str, message: &str);
}
