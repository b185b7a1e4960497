use std::error::Error;

use crate::log::call_frame::CallFrame;

/// Line prefix for every rendered stack frame.
const FRAME_INDENT: &str = "    ";

/// An ordered list of call frames, innermost first.
///
/// A snapshot taken with [`StackSnapshot::capture`] starts at the function
/// that called `capture`; frames belonging to the unwinder or to this module
/// are dropped. A snapshot taken from an error also carries a headline with
/// the error message and its `source()` chain, so it can later be attached to
/// a log line the way an exception trace would be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSnapshot {
    headline: Option<String>,
    frames: Vec<CallFrame>,
}

impl StackSnapshot {
    /// Captures the current thread's stack.
    #[inline(never)]
    #[must_use]
    pub fn capture() -> Self {
        Self {
            headline: None,
            frames: collect_frames(),
        }
    }

    /// Captures the current stack and labels it with `err` and its causes.
    #[inline(never)]
    #[must_use]
    pub fn capture_error(err: &dyn Error) -> Self {
        Self {
            headline: Some(error_chain(err)),
            frames: collect_frames(),
        }
    }

    /// Builds a snapshot from frames obtained elsewhere.
    #[must_use]
    pub fn from_frames(frames: Vec<CallFrame>) -> Self {
        Self {
            headline: None,
            frames,
        }
    }

    #[must_use]
    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.headline = Some(headline.into());
        self
    }

    #[must_use]
    pub fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    #[must_use]
    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Renders up to `depth` frames starting at index `skip`.
    ///
    /// Each frame becomes `"    <type>.<method>(<file>:<line>)"`; lines are
    /// joined with `\n`. `skip + depth` is clamped to the frames available, so
    /// a short stack yields fewer lines and a stack shorter than `skip` yields
    /// nothing. The headline, if any, comes first and does not count towards
    /// `depth`.
    #[must_use]
    pub fn render(&self, skip: usize, depth: usize) -> String {
        let start = skip.min(self.frames.len());
        let end = skip.saturating_add(depth).min(self.frames.len());

        let mut lines: Vec<String> = Vec::with_capacity(end - start + 1);
        if let Some(headline) = &self.headline {
            lines.push(headline.clone());
        }
        lines.extend(
            self.frames[start..end]
                .iter()
                .map(|frame| format!("{FRAME_INDENT}{frame}")),
        );
        lines.join("\n")
    }

    /// Renders the whole snapshot.
    #[must_use]
    pub fn render_all(&self) -> String {
        self.render(0, self.frames.len())
    }
}

/// Walks the current stack and returns every symbolized frame above the
/// capture machinery.
#[inline(never)]
fn collect_frames() -> Vec<CallFrame> {
    let trace = backtrace::Backtrace::new();

    let frames = trace.frames().iter().flat_map(|frame| {
        // Inlined calls show up as extra symbols of the same physical frame.
        frame.symbols().iter().filter_map(|symbol| {
            let name = symbol.name()?;
            Some(CallFrame::from_symbol(
                &format!("{name:#}"),
                symbol.filename(),
                symbol.lineno(),
            ))
        })
    });

    frames
        .skip_while(|frame| is_capture_internal(&frame.qualified_name()))
        .collect()
}

fn is_capture_internal(name: &str) -> bool {
    name.contains("backtrace::") || name.contains(module_path!())
}

/// `"outer: middle: root"` for an error and its sources.
fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Renders `depth` frames of the current stack starting `skip` frames above
/// the caller of this function (`skip = 0` is the caller itself).
#[inline(never)]
#[must_use]
pub fn capture_call_stack(skip: usize, depth: usize) -> String {
    StackSnapshot::capture().render(skip, depth)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::fmt;

    fn frames(n: u32) -> Vec<CallFrame> {
        (0..n)
            .map(|i| CallFrame::new("app::Worker", format!("step{i}"), "worker.rs", 10 + i))
            .collect()
    }

    #[test]
    fn render_clamps_depth_to_available_frames() {
        let snap = StackSnapshot::from_frames(frames(1));
        let out = snap.render(0, 3);
        assert_eq!(out.lines().count(), 1);
        assert_eq!(out, "    app::Worker.step0(worker.rs:10)");
    }

    #[test]
    fn render_past_the_end_is_empty() {
        let snap = StackSnapshot::from_frames(frames(2));
        assert_eq!(snap.render(5, 3), "");
        assert_eq!(snap.render(usize::MAX, usize::MAX), "");
    }

    #[test]
    fn render_slices_from_skip() {
        let snap = StackSnapshot::from_frames(frames(5));
        let out = snap.render(1, 2);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "    app::Worker.step1(worker.rs:11)",
                "    app::Worker.step2(worker.rs:12)"
            ]
        );
    }

    #[test]
    fn headline_is_not_counted_in_depth() {
        let snap = StackSnapshot::from_frames(frames(3)).with_headline("boom");
        let out = snap.render(0, 2);
        assert_eq!(out.lines().next(), Some("boom"));
        assert_eq!(out.lines().count(), 3);
    }

    #[derive(Debug)]
    struct Leaf;
    impl fmt::Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }
    impl Error for Leaf {}

    #[derive(Debug)]
    struct Outer(Leaf);
    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("saving settings failed")
        }
    }
    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn error_snapshot_headline_includes_sources() {
        let snap = StackSnapshot::capture_error(&Outer(Leaf));
        assert_eq!(snap.headline(), Some("saving settings failed: disk full"));
        assert!(snap.render_all().starts_with("saving settings failed: disk full"));
    }

    #[test]
    fn live_capture_starts_outside_the_unwinder() {
        let snap = StackSnapshot::capture();
        if let Some(first) = snap.frames().first() {
            assert!(!is_capture_internal(&first.qualified_name()));
        }
    }

    #[test]
    fn capture_call_stack_respects_depth() {
        let out = capture_call_stack(0, 2);
        assert!(out.lines().count() <= 2);
        assert!(out.lines().all(|l| l.starts_with(FRAME_INDENT)));
    }
}
