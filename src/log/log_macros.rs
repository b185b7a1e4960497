//! Leveled, `format!`-style logging macros over a [`Log`](crate::log::Log).
//!
//! ```rust
//! use tinylog::log::Log;
//! use tinylog::log::NoopLogSink;
//!
//! let log = Log::with_sink(NoopLogSink);
//! tinylog::log_info!(log, "NET", "connected to {} in {}ms", "10.0.0.2", 12);
//! ```
//!
//! # Feature Flags
//! Specific log levels are controlled by cargo features:
//! `log-verbose`, `log-debug`, `log-info`, `log-warn`, `log-error`.
//!
//! If a feature is disabled, the corresponding macro expands to `()`, removing
//! all formatting and allocation overhead at compile time. The runtime level
//! gate of the facade still applies to everything that is compiled in.

// ============================================================================
// 1. GENERIC MACRO
// ============================================================================

/// Formats and emits at a severity chosen at runtime. Never compiled out.
#[macro_export]
macro_rules! tlog {
    ($log:expr, $sev:expr, $tag:expr, $($arg:tt)*) => {{
        let __msg = format!($($arg)*);
        $log.log($sev, $tag, &__msg);
    }};
}

// ============================================================================
// 2. LEVEL-SPECIFIC MACROS (Feature Gated)
// ============================================================================

// ---------------------- VERBOSE ----------------------
#[cfg(feature = "log-verbose")]
#[macro_export]
macro_rules! log_verbose { ($log:expr, $tag:expr, $($arg:tt)*) => { $crate::tlog!($log, $crate::log::Severity::Verbose, $tag, $($arg)*) } }

#[cfg(not(feature = "log-verbose"))]
#[macro_export]
macro_rules! log_verbose {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! log_debug { ($log:expr, $tag:expr, $($arg:tt)*) => { $crate::tlog!($log, $crate::log::Severity::Debug, $tag, $($arg)*) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! log_info { ($log:expr, $tag:expr, $($arg:tt)*) => { $crate::tlog!($log, $crate::log::Severity::Info, $tag, $($arg)*) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- WARN ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! log_warn { ($log:expr, $tag:expr, $($arg:tt)*) => { $crate::tlog!($log, $crate::log::Severity::Warn, $tag, $($arg)*) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        ()
    };
}

// ---------------------- ERROR ----------------------
// Generally always enabled, but consistent structure allows disabling it too.
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! log_error { ($log:expr, $tag:expr, $($arg:tt)*) => { $crate::tlog!($log, $crate::log::Severity::Error, $tag, $($arg)*) } }

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        ()
    };
}
