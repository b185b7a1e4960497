use std::time::{SystemTime, UNIX_EPOCH};

use crate::log::severity::Severity;

/// One line queued for the file sink.
///
/// The message is owned so it can cross into the writer thread after the
/// emitting call has returned.
#[derive(Debug, Clone)]
pub struct LogMsg {
    /// The severity the line was emitted with.
    pub severity: Severity,
    /// Wall-clock time of the emission in milliseconds since the UNIX epoch.
    pub ts_ms: u128,
    /// Caller-supplied tag.
    pub tag: String,
    /// The formatted line (or attached block) as produced by the facade.
    pub text: String,
}

impl LogMsg {
    /// Creates a new `LogMsg` stamped with the current time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tinylog::log::{LogMsg, Severity};
    ///
    /// let msg = LogMsg::new(Severity::Info, "NET", "Connection established");
    /// assert_eq!(msg.tag, "NET");
    /// ```
    pub fn new(severity: Severity, tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            severity,
            ts_ms: now_millis(),
            tag: tag.into(),
            text: text.into(),
        }
    }
}

pub(crate) fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
