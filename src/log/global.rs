//! Process-wide facade instance.
//!
//! Libraries and binaries that prefer not to thread an `Arc<Log>` through
//! every layer install one facade at start-up and reach it from anywhere.
//! Until something is installed, the first use creates a console-backed
//! facade with default settings.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    config::{Config, ConfigError},
    log::{
        Attachment, Log,
        console_sink::ConsoleSink,
        file_logger::FileLogger,
        log_sink::LogSink,
        settings::LogSettings,
        severity::Severity,
        stack_snapshot::StackSnapshot,
    },
};

/// Symbol prefix of the forwarding functions below.
pub(crate) const FRAME_PREFIX: &str = concat!(module_path!(), "::");

static GLOBAL: OnceCell<Arc<Log>> = OnceCell::new();
static FILE_SINK: OnceCell<FileLogger> = OnceCell::new();

/// Installs `log` as the process facade.
///
/// # Errors
///
/// Gives `log` back if a facade was already installed (or created by a
/// previous [`get`]).
pub fn install(log: Arc<Log>) -> Result<(), Arc<Log>> {
    GLOBAL.set(log)
}

/// The process facade, creating a console-backed one on first use.
pub fn get() -> &'static Arc<Log> {
    GLOBAL.get_or_init(|| Arc::new(Log::with_sink(ConsoleSink)))
}

#[must_use]
pub fn is_installed() -> bool {
    GLOBAL.get().is_some()
}

/// Loads a configuration file and installs a facade built from its
/// `[Logging]` section.
///
/// With `log_path` or `log_filename` set, lines go to a [`FileLogger`] kept
/// alive for the rest of the process; otherwise to the console.
///
/// If a facade is already installed, the settings are applied to it instead.
/// That only works for file settings when the installed facade is the one a
/// previous call started with a file sink.
///
/// # Errors
///
/// Any [`ConfigError`] from reading or interpreting the file, and
/// [`ConfigError::AlreadyInstalled`] when a file sink is configured but the
/// process facade already writes elsewhere.
pub fn init_from_config(path: &str) -> Result<&'static Arc<Log>, ConfigError> {
    let config = Config::load(path)?;
    let settings = LogSettings::from_config(&config)?;
    let wants_file = settings.file_dir.is_some() || settings.file_name.is_some();

    if let Some(existing) = GLOBAL.get() {
        if wants_file && FILE_SINK.get().is_none() {
            return Err(ConfigError::AlreadyInstalled);
        }
        existing.apply(&settings);
        return Ok(existing);
    }

    let sink: Arc<dyn LogSink> = if wants_file {
        let logger = FILE_SINK.get_or_init(|| FileLogger::from_settings(&settings));
        Arc::new(logger.handle())
    } else {
        Arc::new(ConsoleSink)
    };

    GLOBAL
        .set(Arc::new(Log::from_settings(sink, &settings)))
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    Ok(get())
}

/// Waits for the file sink started by [`init_from_config`], if any, to
/// write out everything queued so far.
pub fn flush() {
    if let Some(logger) = FILE_SINK.get() {
        logger.flush();
    }
}

macro_rules! forward_severity {
    ($($plain:ident, $with:ident;)+) => {
        $(
            #[doc = concat!("[`Log::", stringify!($plain), "`] on the process facade.")]
            #[track_caller]
            pub fn $plain(tag: &str, message: &str) {
                get().$plain(tag, message);
            }

            #[doc = concat!("[`Log::", stringify!($with), "`] on the process facade.")]
            #[track_caller]
            pub fn $with<'a>(tag: &str, message: &str, attachment: impl Into<Attachment<'a>>) {
                get().$with(tag, message, attachment);
            }
        )+
    };
}

forward_severity! {
    verbose, verbose_with;
    debug, debug_with;
    info, info_with;
    warn, warn_with;
    error, error_with;
}

/// [`Log::error_trace`] on the process facade.
#[track_caller]
pub fn error_trace(tag: &str, trace: &StackSnapshot) {
    get().error_trace(tag, trace);
}

/// [`Log::log`] on the process facade.
#[track_caller]
pub fn log(severity: Severity, tag: &str, message: &str) {
    get().log(severity, tag, message);
}
