//! The process facade is a one-per-process resource, so this file holds a
//! single test that owns it.

use std::fs;

use tinylog::log::{CallFrame, Severity, StackSnapshot, global};

#[test]
fn init_from_config_installs_a_file_backed_facade() {
    let dir = std::env::temp_dir().join(format!("tinylog_global_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let cfg_path = dir.join("app.ini");
    fs::write(
        &cfg_path,
        format!(
            "[Logging]\nmin_severity = info\nshow_line_info = false\nlog_path = {}\nlog_filename = itest\n",
            dir.display()
        ),
    )
    .expect("write config");

    assert!(!global::is_installed());
    let log = global::init_from_config(cfg_path.to_str().expect("utf8 path")).expect("config loads");
    assert!(global::is_installed());
    assert_eq!(log.min_severity(), Severity::Info);
    assert!(!log.shows_line_info());

    global::debug("APP", "filtered out");
    global::info("APP", "started");
    global::error_with("APP", "crashed", 2usize);
    let trace = StackSnapshot::from_frames(vec![CallFrame::new("app::Db", "open", "db.rs", 7)])
        .with_headline("disk unplugged");
    global::error_trace("APP", &trace);
    global::flush();

    let log_file = fs::read_dir(&dir)
        .expect("list temp dir")
        .filter_map(Result::ok)
        .map(|e| e.path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("itest-") && n.ends_with(".log"))
        })
        .expect("log file created");
    let contents = fs::read_to_string(&log_file).expect("read log file");

    assert!(!contents.contains("filtered out"));
    assert!(contents.contains("[INFO] "));
    assert!(contents.contains(" APP | started"));
    assert!(contents.contains(" APP | crashed"));
    assert!(contents.contains(" APP | disk unplugged\n    app::Db.open(db.rs:7)"));

    // A second init only re-applies settings to the installed facade.
    fs::write(&cfg_path, "[Logging]\nmin_severity = error\n").expect("rewrite config");
    let again = global::init_from_config(cfg_path.to_str().expect("utf8 path")).expect("reload");
    assert!(std::ptr::eq(log, again));
    assert_eq!(again.min_severity(), Severity::Error);

    let _ = fs::remove_dir_all(&dir);
}
