use crate::log::{log_sink::LogSink, severity::Severity};

#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    #[inline]
    fn emit(&self, _severity: Severity, _tag: &str, _message: &str) {}
}
