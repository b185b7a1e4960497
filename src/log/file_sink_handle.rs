use std::sync::mpsc;

use crate::log::{log_msg::LogMsg, log_sink::LogSink, severity::Severity};

pub(crate) enum SinkCommand {
    Line(LogMsg),
    Flush(mpsc::SyncSender<()>),
    Shutdown,
}

/// Lightweight, cloneable handle to a [`FileLogger`](crate::log::FileLogger).
///
/// `FileSinkHandle` enqueues `LogMsg` into a bounded `SyncSender`. Calls to
/// [`try_emit`](Self::try_emit) are non-blocking: if the queue is full, the
/// line is dropped and an error is returned. As a [`LogSink`] it silently
/// drops instead, since a logging call must never fail its caller.
#[derive(Clone)]
pub struct FileSinkHandle {
    pub(super) tx: mpsc::SyncSender<SinkCommand>,
}

impl LogSink for FileSinkHandle {
    #[inline]
    fn emit(&self, severity: Severity, tag: &str, message: &str) {
        let _ = self.try_emit(LogMsg::new(severity, tag, message));
    }
}

impl FileSinkHandle {
    /// Attempts to enqueue a line without blocking.
    ///
    /// # Errors
    /// Returns:
    /// - `Err(TrySendError::Full(_))` when the bounded queue is at capacity (line is not sent).
    /// - `Err(TrySendError::Disconnected(_))` when the writer has shut down.
    pub fn try_emit(&self, msg: LogMsg) -> Result<(), mpsc::TrySendError<LogMsg>> {
        self.tx
            .try_send(SinkCommand::Line(msg))
            .map_err(|err| match err {
                mpsc::TrySendError::Full(cmd) => mpsc::TrySendError::Full(into_msg(cmd)),
                mpsc::TrySendError::Disconnected(cmd) => {
                    mpsc::TrySendError::Disconnected(into_msg(cmd))
                }
            })
    }

    /// Waits until the writer has flushed everything queued before this call.
    ///
    /// Returns immediately if the writer is gone.
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        if self.tx.send(SinkCommand::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

fn into_msg(cmd: SinkCommand) -> LogMsg {
    match cmd {
        SinkCommand::Line(msg) => msg,
        // Only `Line` is ever passed to `try_send`.
        SinkCommand::Flush(_) | SinkCommand::Shutdown => {
            LogMsg::new(Severity::Verbose, "", "")
        }
    }
}
