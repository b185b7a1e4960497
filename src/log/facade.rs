//! The logging facade: level gate, one-shot interception, formatting and
//! call-site capture in front of a single [`LogSink`].

use std::{panic::Location, sync::Arc};

use arc_swap::{ArcSwap, ArcSwapOption};

use crate::log::{
    call_frame::CallFrame,
    formatter::Formatter,
    global,
    interceptor::Interceptor,
    log_sink::LogSink,
    settings::{LogSettings, Settings, default_formatter},
    severity::Severity,
    stack_snapshot::StackSnapshot,
};

/// Symbol prefix shared by every method of [`Log`].
const FACADE_FRAME_PREFIX: &str = concat!(module_path!(), "::Log::");

/// Extra block emitted as a second sink line after the message.
#[derive(Debug, Clone, Copy, Default)]
pub enum Attachment<'a> {
    #[default]
    None,
    /// Up to `n` frames of the live stack, starting just above the caller.
    CallStack(usize),
    /// A trace captured earlier, typically with
    /// [`StackSnapshot::capture_error`].
    Trace(&'a StackSnapshot),
}

impl From<usize> for Attachment<'_> {
    fn from(depth: usize) -> Self {
        Attachment::CallStack(depth)
    }
}

impl<'a> From<&'a StackSnapshot> for Attachment<'a> {
    fn from(trace: &'a StackSnapshot) -> Self {
        Attachment::Trace(trace)
    }
}

struct InstalledInterceptor(Arc<dyn Interceptor>);

/// Puts the taken interceptor back unless the running one installed a
/// replacement. Runs on unwind too, so a panicking interceptor is not lost.
struct RestoreOnDrop<'a> {
    slot: &'a ArcSwapOption<InstalledInterceptor>,
    taken: Option<Arc<InstalledInterceptor>>,
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(taken) = self.taken.take() {
            let empty: Option<Arc<InstalledInterceptor>> = None;
            let _ = self.slot.compare_and_swap(&empty, Some(taken));
        }
    }
}

/// Process logging facade.
///
/// A `Log` owns its configuration and forwards every admitted emission to one
/// sink. Build one at start-up, share it as `Arc<Log>` (or install it with
/// [`global::install`]) and call the per-severity methods from anywhere.
///
/// Every emission runs the same pipeline:
///
/// 1. drop the message if logging is disabled or it is below the minimum
///    severity;
/// 2. offer it to the interceptor, if one is installed; `true` ends here;
/// 3. hand the sink either the formatted line (with call-site info) or the
///    raw message;
/// 4. hand the sink the rendered attachment, if it is non-empty.
///
/// Configuration is published as immutable snapshots, so concurrent setters
/// are last-writer-wins and an emission never sees half of an update.
pub struct Log {
    sink: Arc<dyn LogSink>,
    settings: ArcSwap<Settings>,
    interceptor: ArcSwapOption<InstalledInterceptor>,
}

macro_rules! severity_methods {
    ($($plain:ident, $with:ident => $severity:expr;)+) => {
        $(
            #[doc = concat!("Emits `message` at `", stringify!($severity), "`.")]
            #[track_caller]
            #[inline]
            pub fn $plain(&self, tag: &str, message: &str) {
                self.dispatch($severity, tag, message, Attachment::None);
            }

            #[doc = concat!(
                "Emits `message` at `", stringify!($severity),
                "` followed by a call-stack depth (`usize`) or a captured trace (`&StackSnapshot`)."
            )]
            #[track_caller]
            #[inline]
            pub fn $with<'a>(&self, tag: &str, message: &str, attachment: impl Into<Attachment<'a>>) {
                self.dispatch($severity, tag, message, attachment.into());
            }
        )+
    };
}

impl Log {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            settings: ArcSwap::from_pointee(Settings::default()),
            interceptor: ArcSwapOption::empty(),
        }
    }

    pub fn with_sink<S: LogSink + 'static>(sink: S) -> Self {
        Self::new(Arc::new(sink))
    }

    /// Builds a facade already configured from a `[Logging]` section.
    pub fn from_settings(sink: Arc<dyn LogSink>, settings: &LogSettings) -> Self {
        let log = Self::new(sink);
        log.apply(settings);
        log
    }

    // ---------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------

    /// Turns all output on or off.
    pub fn enable(&self, enabled: bool) {
        self.update(|s| s.enabled = enabled);
    }

    /// Whether the formatter and call-site lookup run for each line.
    pub fn set_show_line_info(&self, show: bool) {
        self.update(|s| s.show_line_info = show);
    }

    /// Messages below `severity` are dropped before interception.
    pub fn set_min_severity(&self, severity: Severity) {
        self.update(|s| s.min_severity = severity);
    }

    /// Installs `formatter`, or the default one for `None`.
    ///
    /// Returns the formatter that was active before the call so it can be put
    /// back later.
    pub fn set_formatter(&self, formatter: Option<Arc<dyn Formatter>>) -> Arc<dyn Formatter> {
        let next = formatter.unwrap_or_else(default_formatter);
        let prev = self.settings.rcu(|cur| Settings {
            formatter: Arc::clone(&next),
            ..Settings::clone(cur)
        });
        Arc::clone(&prev.formatter)
    }

    /// Installs `interceptor`, replacing any current one, or clears the slot.
    pub fn set_interceptor(&self, interceptor: Option<Arc<dyn Interceptor>>) {
        self.interceptor
            .store(interceptor.map(|i| Arc::new(InstalledInterceptor(i))));
    }

    /// Shorthand for `set_interceptor(Some(Arc::new(interceptor)))`.
    pub fn intercept_with<I: Interceptor + 'static>(&self, interceptor: I) {
        self.set_interceptor(Some(Arc::new(interceptor)));
    }

    /// Restores enabled, verbose, line info on, default formatter and no
    /// interceptor.
    pub fn reset_to_defaults(&self) {
        self.settings.store(Arc::new(Settings::default()));
        self.interceptor.store(None);
    }

    /// Pushes a configuration-file view into the facade in one step.
    pub fn apply(&self, settings: &LogSettings) {
        self.update(|s| {
            s.enabled = settings.enabled;
            s.min_severity = settings.min_severity;
            s.show_line_info = settings.show_line_info;
        });
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.settings.load().enabled
    }

    #[must_use]
    pub fn min_severity(&self) -> Severity {
        self.settings.load().min_severity
    }

    #[must_use]
    pub fn shows_line_info(&self) -> bool {
        self.settings.load().show_line_info
    }

    #[must_use]
    pub fn formatter(&self) -> Arc<dyn Formatter> {
        Arc::clone(&self.settings.load().formatter)
    }

    /// `false` while an interceptor is running, since its slot is empty then.
    #[must_use]
    pub fn has_interceptor(&self) -> bool {
        self.interceptor.load().is_some()
    }

    /// Current configuration snapshot.
    #[must_use]
    pub fn settings(&self) -> Arc<Settings> {
        self.settings.load_full()
    }

    fn update(&self, change: impl Fn(&mut Settings)) {
        self.settings.rcu(|cur| {
            let mut next = Settings::clone(cur);
            change(&mut next);
            next
        });
    }

    // ---------------------------------------------------------------------
    // Emission
    // ---------------------------------------------------------------------

    severity_methods! {
        verbose, verbose_with => Severity::Verbose;
        debug, debug_with => Severity::Debug;
        info, info_with => Severity::Info;
        warn, warn_with => Severity::Warn;
        error, error_with => Severity::Error;
    }

    /// Emits `message` at a severity chosen at runtime.
    #[track_caller]
    #[inline]
    pub fn log(&self, severity: Severity, tag: &str, message: &str) {
        self.dispatch(severity, tag, message, Attachment::None);
    }

    /// Runtime-severity variant of the `*_with` methods.
    #[track_caller]
    #[inline]
    pub fn log_with<'a>(
        &self,
        severity: Severity,
        tag: &str,
        message: &str,
        attachment: impl Into<Attachment<'a>>,
    ) {
        self.dispatch(severity, tag, message, attachment.into());
    }

    /// Logs a captured trace on its own, with an empty message line.
    #[track_caller]
    #[inline]
    pub fn error_trace(&self, tag: &str, trace: &StackSnapshot) {
        self.dispatch(Severity::Error, tag, "", Attachment::Trace(trace));
    }

    #[track_caller]
    fn dispatch(&self, severity: Severity, tag: &str, message: &str, attachment: Attachment<'_>) {
        let settings = self.settings.load_full();
        if !settings.admits(severity) {
            return;
        }
        if self.intercept(severity, tag, message) {
            return;
        }

        let caller = Location::caller();
        let wants_stack = matches!(attachment, Attachment::CallStack(depth) if depth > 0);
        // Captured here, directly below the facade entry points.
        let snapshot = if settings.show_line_info || wants_stack {
            Some(StackSnapshot::capture())
        } else {
            None
        };
        let caller_index = snapshot
            .as_ref()
            .and_then(|snap| locate_caller(snap.frames(), caller));

        if settings.show_line_info {
            let frame = caller_frame(snapshot.as_ref(), caller_index, caller);
            self.sink
                .emit(severity, tag, &settings.formatter.format(message, &frame));
        } else {
            self.sink.emit(severity, tag, message);
        }

        let extra = match attachment {
            Attachment::None => String::new(),
            Attachment::CallStack(depth) => snapshot.as_ref().map_or_else(String::new, |snap| {
                // Without a located caller there is no safe place to start.
                caller_index.map_or_else(String::new, |idx| snap.render(idx + 1, depth))
            }),
            Attachment::Trace(trace) => trace.render_all(),
        };
        if !extra.is_empty() {
            self.sink.emit(severity, tag, &extra);
        }
    }

    /// Offers one emission to the installed interceptor.
    ///
    /// The slot is emptied for the duration of the call: nested emissions
    /// from the interceptor body cannot reach it again, but do reach any
    /// interceptor the body installs. Afterwards the taken interceptor goes
    /// back only into a still-empty slot.
    fn intercept(&self, severity: Severity, tag: &str, message: &str) -> bool {
        let Some(taken) = self.interceptor.swap(None) else {
            return false;
        };
        let interceptor = Arc::clone(&taken.0);
        let _restore = RestoreOnDrop {
            slot: &self.interceptor,
            taken: Some(taken),
        };
        interceptor.on_intercept(self, severity, tag, message)
    }
}

/// Index of the frame that called into the facade.
///
/// An exact file/line match against the `#[track_caller]` location wins;
/// otherwise the first frame past the leading facade frames is used.
fn locate_caller(frames: &[CallFrame], caller: &Location<'_>) -> Option<usize> {
    if let Some(idx) = frames.iter().position(|f| f.is_at(caller)) {
        return Some(idx);
    }
    let is_internal = |f: &CallFrame| {
        let name = f.qualified_name();
        name.starts_with(FACADE_FRAME_PREFIX) || name.starts_with(global::FRAME_PREFIX)
    };
    if !frames.first().is_some_and(is_internal) {
        return None;
    }
    frames.iter().position(|f| !is_internal(f))
}

/// The call-site frame to format, never without a file and line.
fn caller_frame(
    snapshot: Option<&StackSnapshot>,
    caller_index: Option<usize>,
    caller: &Location<'_>,
) -> CallFrame {
    snapshot
        .zip(caller_index)
        .and_then(|(snap, idx)| snap.frames().get(idx).cloned())
        .map_or_else(
            || CallFrame::from_location(caller),
            |frame| frame.or_location(caller),
        )
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Log")
            .field("settings", &*self.settings.load())
            .field("has_interceptor", &self.has_interceptor())
            .finish_non_exhaustive()
    }
}
