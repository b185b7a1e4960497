//! Runs in its own process: the facade is created by an early log call
//! before any configuration is loaded.

use std::fs;

use tinylog::{
    config::ConfigError,
    log::{Severity, global},
};

#[test]
fn late_config_cannot_redirect_an_existing_console_facade() {
    let dir = std::env::temp_dir().join(format!("tinylog_preinstalled_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");

    global::info("APP", "early");
    assert!(global::is_installed());

    let file_cfg = dir.join("file.ini");
    fs::write(
        &file_cfg,
        format!(
            "[Logging]\nmin_severity = warn\nlog_path = {}\nlog_filename = late\n",
            dir.display()
        ),
    )
    .expect("write config");
    let result = global::init_from_config(file_cfg.to_str().expect("utf8 path"));
    assert!(matches!(result, Err(ConfigError::AlreadyInstalled)));
    assert_eq!(global::get().min_severity(), Severity::Verbose);

    let no_log_file = fs::read_dir(&dir)
        .expect("list temp dir")
        .filter_map(Result::ok)
        .all(|e| e.path().extension().is_none_or(|ext| ext != "log"));
    assert!(no_log_file);

    let console_cfg = dir.join("console.ini");
    fs::write(&console_cfg, "[Logging]\nmin_severity = warn\n").expect("write config");
    let log = global::init_from_config(console_cfg.to_str().expect("utf8 path"))
        .expect("console settings apply");
    assert_eq!(log.min_severity(), Severity::Warn);

    let _ = fs::remove_dir_all(&dir);
}
