use crate::log::call_frame::CallFrame;

/// Turns a message and its call site into the line handed to the sink.
///
/// Formatters are stateless and may be swapped at runtime with
/// [`Log::set_formatter`](crate::log::Log::set_formatter). Any
/// `Fn(&str, &CallFrame) -> String` closure is a formatter.
pub trait Formatter: Send + Sync {
    fn format(&self, message: &str, frame: &CallFrame) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&str, &CallFrame) -> String + Send + Sync,
{
    #[inline]
    fn format(&self, message: &str, frame: &CallFrame) -> String {
        self(message, frame)
    }
}

/// One-line layout: `<type>.<method>(<file>:<line>): <message>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn format(&self, message: &str, frame: &CallFrame) -> String {
        format!("{frame}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let frame = CallFrame::new("app::Screen", "on_click", "screen.rs", 42);
        assert_eq!(
            DefaultFormatter.format("hello", &frame),
            "app::Screen.on_click(screen.rs:42): hello"
        );
    }

    #[test]
    fn empty_message_renders_empty_segment() {
        let frame = CallFrame::new("app::Screen", "on_click", "screen.rs", 42);
        assert_eq!(
            DefaultFormatter.format("", &frame),
            "app::Screen.on_click(screen.rs:42): "
        );
    }

    #[test]
    fn closures_are_formatters() {
        let brief = |msg: &str, frame: &CallFrame| format!("{}:{} {msg}", frame.file(), frame.line());
        let frame = CallFrame::new("x::Y", "z", "y.rs", 3);
        assert_eq!(brief.format("hi", &frame), "y.rs:3 hi");
    }
}
