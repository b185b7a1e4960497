use std::{fmt, str::FromStr};

use crate::config::ConfigError;

/// Defines the severity levels for log messages.
///
/// The declaration order is the filtering order: a facade configured with a
/// minimum of `Info` drops `Verbose` and `Debug`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Designates very fine-grained informational events.
    #[default]
    Verbose,
    /// Designates fine-grained informational events that are most useful to debug an application.
    Debug,
    /// Designates informational messages that highlight the progress of the application at coarse-grained level.
    Info,
    /// Designates potentially harmful situations.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 5] = [
        Severity::Verbose,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Maps a numeric platform priority (2 = verbose ... 6 = error).
    ///
    /// Anything outside that range yields `None`.
    #[must_use]
    pub const fn from_priority(priority: i32) -> Option<Self> {
        match priority {
            2 => Some(Severity::Verbose),
            3 => Some(Severity::Debug),
            4 => Some(Severity::Info),
            5 => Some(Severity::Warn),
            6 => Some(Severity::Error),
            _ => None,
        }
    }

    /// Numeric platform priority, inverse of [`Severity::from_priority`].
    #[must_use]
    pub const fn priority(self) -> i32 {
        match self {
            Severity::Verbose => 2,
            Severity::Debug => 3,
            Severity::Info => 4,
            Severity::Warn => 5,
            Severity::Error => 6,
        }
    }

    /// Single-letter tag used by the console sink (`V`, `D`, `I`, `W`, `E`).
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Severity::Verbose => 'V',
            Severity::Debug => 'D',
            Severity::Info => 'I',
            Severity::Warn => 'W',
            Severity::Error => 'E',
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Verbose => "VERBOSE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v" | "verbose" | "trace" => Ok(Severity::Verbose),
            "d" | "debug" => Ok(Severity::Debug),
            "i" | "info" => Ok(Severity::Info),
            "w" | "warn" | "warning" => Ok(Severity::Warn),
            "e" | "error" => Ok(Severity::Error),
            _ => Err(ConfigError::InvalidSeverity(s.to_string())),
        }
    }
}
