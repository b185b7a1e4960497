//! tinylog is a small logging facade for applications that already have a
//! place to write lines to.
//!
//! It puts level filtering, pluggable message formatting with call-site
//! information, one-shot interception and call-stack capture in front of a
//! single [`LogSink`](log::LogSink).
//!
//! ```rust
//! use std::sync::Arc;
//! use tinylog::log::{ConsoleSink, Log, Severity};
//!
//! let log = Arc::new(Log::with_sink(ConsoleSink));
//! log.set_min_severity(Severity::Info);
//! log.debug("NET", "dropped: below the minimum");
//! log.info("NET", "connected");
//! log.warn_with("NET", "slow handshake", 3usize); // plus three caller frames
//! ```

/// Handles configuration loading and management.
pub mod config;
/// The facade, its pluggable parts and the bundled sinks.
pub mod log;
