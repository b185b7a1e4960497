use std::sync::{Arc, Mutex, PoisonError};

use crate::log::{log_sink::LogSink, severity::Severity};

/// Sink that remembers every line it was handed.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    lines: Arc<Mutex<Vec<(Severity, String, String)>>>,
}

impl RecordingSink {
    pub(crate) fn lines(&self) -> Vec<(Severity, String, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, _, m)| m).collect()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, severity: Severity, tag: &str, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, tag.to_string(), message.to_string()));
    }
}
