use std::{fmt, path::PathBuf, sync::Arc};

use crate::{
    config::{Config, ConfigError},
    log::{
        formatter::{DefaultFormatter, Formatter},
        severity::Severity,
    },
};

/// Section of the configuration file read by [`LogSettings::from_config`].
pub const CONFIG_SECTION: &str = "Logging";

/// One consistent view of the facade configuration.
///
/// The facade never mutates a published snapshot: setters build a modified
/// copy and swap it in, so an emission always sees the flags and the
/// formatter of the same generation.
#[derive(Clone)]
pub struct Settings {
    pub enabled: bool,
    pub min_severity: Severity,
    pub show_line_info: bool,
    pub formatter: Arc<dyn Formatter>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_severity: Severity::Verbose,
            show_line_info: true,
            formatter: default_formatter(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("enabled", &self.enabled)
            .field("min_severity", &self.min_severity)
            .field("show_line_info", &self.show_line_info)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Whether a message of `severity` passes the gate.
    #[inline]
    #[must_use]
    pub fn admits(&self, severity: Severity) -> bool {
        self.enabled && severity >= self.min_severity
    }
}

pub(crate) fn default_formatter() -> Arc<dyn Formatter> {
    Arc::new(DefaultFormatter)
}

/// Logging options as written in a configuration file.
///
/// ```text
/// [Logging]
/// enabled = true
/// min_severity = info
/// show_line_info = false
/// log_path = ~/.local/state/myapp/logs
/// log_filename = myapp
/// ```
///
/// Every key is optional; an absent key keeps the facade default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub enabled: bool,
    pub min_severity: Severity,
    pub show_line_info: bool,
    /// Directory for the file sink; `None` means `logs/` next to the executable.
    pub file_dir: Option<PathBuf>,
    /// Prefix of the log file name.
    pub file_name: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_severity: Severity::Verbose,
            show_line_info: true,
            file_dir: None,
            file_name: None,
        }
    }
}

impl LogSettings {
    /// Reads the `[Logging]` section.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBool`] or [`ConfigError::InvalidSeverity`] when a
    /// present key holds a value that cannot be interpreted.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let enabled = config
            .get_bool(CONFIG_SECTION, "enabled")?
            .unwrap_or(defaults.enabled);
        let show_line_info = config
            .get_bool(CONFIG_SECTION, "show_line_info")?
            .unwrap_or(defaults.show_line_info);
        let min_severity = match config.get_non_empty(CONFIG_SECTION, "min_severity") {
            Some(raw) => raw.parse()?,
            None => defaults.min_severity,
        };

        Ok(Self {
            enabled,
            min_severity,
            show_line_info,
            file_dir: config
                .get_non_empty(CONFIG_SECTION, "log_path")
                .map(expand_path),
            file_name: config
                .get_non_empty(CONFIG_SECTION, "log_filename")
                .map(str::to_string),
        })
    }
}

/// Expands tilde (`~`) in file paths to the user's home directory.
pub(crate) fn expand_path(path_str: &str) -> PathBuf {
    if path_str.starts_with('~') {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from);

        if let Some(mut home_path) = home {
            if path_str == "~" {
                return home_path;
            }
            if let Some(rest) = path_str
                .strip_prefix("~/")
                .or_else(|| path_str.strip_prefix("~\\"))
            {
                home_path.push(rest);
                return home_path;
            }
        }
    }
    PathBuf::from(path_str)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn defaults_admit_everything() {
        let s = Settings::default();
        for sev in Severity::ALL {
            assert!(s.admits(sev));
        }
    }

    #[test]
    fn disabled_admits_nothing() {
        let s = Settings {
            enabled: false,
            ..Settings::default()
        };
        assert!(!s.admits(Severity::Error));
    }

    #[test]
    fn reads_logging_section() {
        let cfg = Config::parse(
            "[Logging]\nenabled = off\nmin_severity = info\nshow_line_info = 0\nlog_filename = demo\n",
        );
        let s = LogSettings::from_config(&cfg).expect("valid settings");
        assert!(!s.enabled);
        assert_eq!(s.min_severity, Severity::Info);
        assert!(!s.show_line_info);
        assert_eq!(s.file_name.as_deref(), Some("demo"));
        assert_eq!(s.file_dir, None);
    }

    #[test]
    fn empty_config_gives_defaults() {
        let s = LogSettings::from_config(&Config::empty()).expect("defaults");
        assert_eq!(s, LogSettings::default());
    }

    #[test]
    fn bad_severity_is_reported() {
        let cfg = Config::parse("[Logging]\nmin_severity = chatty\n");
        assert!(matches!(
            LogSettings::from_config(&cfg),
            Err(ConfigError::InvalidSeverity(_))
        ));
    }

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_path("/var/log/app"), PathBuf::from("/var/log/app"));
    }
}
