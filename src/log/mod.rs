pub mod call_frame;
pub mod console_sink;
pub mod facade;
pub mod file_logger;
pub mod file_sink_handle;
pub mod formatter;
pub mod global;
pub mod interceptor;
pub mod log_macros;
pub mod log_msg;
pub mod log_sink;
pub mod noop_log_sink;
pub mod settings;
pub mod severity;
pub mod stack_snapshot;

#[cfg(test)]
pub(crate) mod test_support;

pub use call_frame::CallFrame;
pub use console_sink::ConsoleSink;
pub use facade::{Attachment, Log};
pub use file_logger::FileLogger;
pub use file_sink_handle::FileSinkHandle;
pub use formatter::{DefaultFormatter, Formatter};
pub use interceptor::Interceptor;
pub use log_msg::LogMsg;
pub use log_sink::LogSink;
pub use noop_log_sink::NoopLogSink;
pub use settings::{LogSettings, Settings};
pub use severity::Severity;
pub use stack_snapshot::{StackSnapshot, capture_call_stack};
