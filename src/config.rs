use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or interpreting a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Error reading file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A severity name that is none of verbose/debug/info/warn/error.
    #[error("Invalid severity: {0:?}")]
    InvalidSeverity(String),

    /// A flag whose value is not a recognizable boolean.
    #[error("Invalid boolean for {key}: {value:?}")]
    InvalidBool { key: String, value: String },

    /// A file sink was configured, but the process facade already exists
    /// with another sink.
    #[error("A process logger is already installed; log file settings cannot be applied")]
    AlreadyInstalled,
}

/// INI-style key/value store: global keys plus `[Section]` tables.
///
/// Blank lines and lines starting with `#` are ignored, values may be wrapped
/// in double quotes.
#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut globals = HashMap::new();
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = &line[1..line.len() - 1];
                current_section = Some(name.trim().to_string());
                continue;
            }

            if let Some(pos) = line.find('=') {
                let key = line[..pos].trim().to_string();
                let value = line[pos + 1..].trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        globals.insert(key, value);
                    }
                    Some(sec) => {
                        sections.entry(sec.clone()).or_default().insert(key, value);
                    }
                }
            }
        }
        Config { globals, sections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_or_default<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key)
            .or_else(|| self.get_global(key))
            .unwrap_or(default)
    }

    /// Reads a boolean flag; `None` when the key is absent or empty.
    ///
    /// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, case-insensitively.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, ConfigError> {
        let Some(raw) = self.get_non_empty(section, key) else {
            return Ok(None);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(true)),
            "false" | "no" | "off" | "0" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBool {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    const SAMPLE: &str = r#"
# global keys
app = "demo"

[Logging]
enabled = yes
min_severity = "warn"
log_path =
"#;

    #[test]
    fn parses_globals_and_sections() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_global("app"), Some("demo"));
        assert_eq!(cfg.get("Logging", "min_severity"), Some("warn"));
        assert_eq!(cfg.get("Logging", "log_path"), Some(""));
        assert_eq!(cfg.get_non_empty("Logging", "log_path"), None);
        assert_eq!(cfg.get_or_default("Logging", "app", "x"), "demo");
        assert_eq!(cfg.get_or_default("Logging", "missing", "x"), "x");
    }

    #[test]
    fn reads_booleans() {
        let cfg = Config::parse(SAMPLE);
        assert_eq!(cfg.get_bool("Logging", "enabled").unwrap(), Some(true));
        assert_eq!(cfg.get_bool("Logging", "absent").unwrap(), None);
        match cfg.get_bool("Logging", "min_severity") {
            Err(ConfigError::InvalidBool { key, value }) => {
                assert_eq!(key, "min_severity");
                assert_eq!(value, "warn");
            }
            other => panic!("expected InvalidBool, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("tinylog_config_that_does_not_exist.ini");
        let err = Config::load(path.to_str().expect("utf8 temp path")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().starts_with("Error reading file"));
    }
}
