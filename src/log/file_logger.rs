use crate::log::{
    file_sink_handle::{FileSinkHandle, SinkCommand},
    log_msg::LogMsg,
    settings::LogSettings,
};

use std::{
    fmt,
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, TrySendError},
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

// -----------------------------------------------------------------------------
// COMPILE-TIME CONFIGURATION
// -----------------------------------------------------------------------------

/// Flush to disk every 100 lines if debug lines are compiled in (to see crashes near real-time).
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 100;

/// Flush to disk every 1000 lines otherwise (to save I/O & CPU).
#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 1_000;

/// Queue capacity used by [`FileLogger::from_settings`].
pub const DEFAULT_QUEUE_CAPACITY: usize = 4_096;

// -----------------------------------------------------------------------------

/// Bounded, non-blocking file sink that writes to a per-process log file.
///
/// A background worker consumes lines from a bounded channel and appends them
/// to the file. Emitting threads only ever `try_send`, so a slow disk turns
/// into dropped lines instead of a stalled caller.
///
/// # Architecture
///
/// 1. **Producers**: the facade calls [`FileSinkHandle::emit`] through `LogSink`.
/// 2. **Queue**: a bounded `mpsc` channel buffers lines.
/// 3. **Consumer**: a dedicated thread writes to disk and flushes periodically.
pub struct FileLogger {
    handle: FileSinkHandle,
    thread: Option<thread::JoinHandle<()>>,
    file_path: PathBuf,
}

impl FileLogger {
    /// Starts the file sink described by a `[Logging]` configuration section.
    #[must_use]
    pub fn from_settings(settings: &LogSettings) -> Self {
        let name = settings.file_name.as_deref();
        match &settings.file_dir {
            Some(dir) => Self::start_in_dir(dir, name, DEFAULT_QUEUE_CAPACITY),
            None => Self::start_default(name, DEFAULT_QUEUE_CAPACITY),
        }
    }

    /// Creates a `logs/` directory next to the executable and starts there.
    ///
    /// # Example Filename
    /// `target/debug/logs/myapp-20251102_023045-pid1234.log`
    #[must_use]
    pub fn start_default(app_name: Option<&str>, cap: usize) -> Self {
        Self::start_in_dir(default_log_dir(), app_name, cap)
    }

    /// Starts the file sink in a specific directory.
    ///
    /// This function:
    /// 1. Creates the target directory if it is missing.
    /// 2. Generates a unique filename based on the timestamp and process ID (PID).
    /// 3. Spawns the background worker thread.
    ///
    /// # Arguments
    ///
    /// * `dir` - The directory where the log file will be created.
    /// * `app_name` - Optional prefix for the log filename.
    /// * `cap` - Capacity of the line queue (backpressure buffer).
    pub fn start_in_dir<D: AsRef<Path>>(dir: D, app_name: Option<&str>, cap: usize) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let ts = FileStamp::now();
        let pid = std::process::id();

        let fname = if let Some(name) = app_name {
            format!("{name}-{ts}-pid{pid}.log")
        } else {
            format!("{ts}-pid{pid}.log")
        };

        let file_path = dir.join(&fname);

        // A zero-capacity channel would turn every try_send into a rendezvous.
        let (tx, rx) = mpsc::sync_channel::<SinkCommand>(cap.max(1));
        let handle = FileSinkHandle { tx };

        let file_path_clone = file_path.clone();

        let thread = thread::Builder::new()
            .name("tinylog-file-sink".into())
            .spawn(move || run_worker(BufWriter::new(open_log_writer(&file_path_clone)), &rx))
            .ok();

        Self {
            handle,
            thread,
            file_path,
        }
    }

    /// Enqueues one line without blocking; see [`FileSinkHandle::try_emit`].
    ///
    /// # Errors
    ///
    /// `TrySendError::Full` when the queue is at capacity (the line is dropped),
    /// `TrySendError::Disconnected` when the worker is gone.
    pub fn try_emit(&self, msg: LogMsg) -> Result<(), TrySendError<LogMsg>> {
        self.handle.try_emit(msg)
    }

    /// Returns a cloneable handle usable as the facade's `LogSink`.
    #[must_use]
    pub fn handle(&self) -> FileSinkHandle {
        self.handle.clone()
    }

    /// Blocks until every line queued so far is on disk.
    pub fn flush(&self) {
        self.handle.flush();
    }

    /// Flushes, stops the worker and waits for it to exit.
    ///
    /// Handles still held elsewhere become disconnected: their lines are
    /// dropped from then on.
    pub fn shutdown(mut self) {
        self.stop();
    }

    /// Returns the path of the active log file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.handle.tx.send(SinkCommand::Shutdown);
            let _ = thread.join();
        }
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<W: Write>(mut out: BufWriter<W>, rx: &mpsc::Receiver<SinkCommand>) {
    let mut lines_written: u32 = 0;

    while let Ok(cmd) = rx.recv() {
        match cmd {
            SinkCommand::Line(m) => {
                let _ = writeln!(
                    &mut out,
                    "[{}] {} {} | {}",
                    m.severity, m.ts_ms, m.tag, m.text
                );
                lines_written = lines_written.wrapping_add(1);

                // Flush periodically to ensure data persists on crash.
                if lines_written.is_multiple_of(FLUSH_BATCH_SIZE) {
                    let _ = out.flush();
                }
            }
            SinkCommand::Flush(ack) => {
                let _ = out.flush();
                let _ = ack.send(());
            }
            SinkCommand::Shutdown => break,
        }
    }

    let _ = out.flush();
}

/// Appends to `path`, else to a shared file in the temp dir, else nowhere.
fn open_log_writer(path: &Path) -> Box<dyn Write + Send> {
    let append = |p: &Path| OpenOptions::new().create(true).append(true).open(p);
    match append(path).or_else(|_| append(&std::env::temp_dir().join("tinylog-fallback.log"))) {
        Ok(file) => Box::new(file),
        Err(_) => Box::new(io::sink()),
    }
}

/// `logs/` beside the running executable, or under the working directory.
fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
        .join("logs")
}

/// UTC wall-clock fields used in log file names, rendered `YYYYMMDD_HHMMSS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FileStamp {
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl FileStamp {
    fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::from_unix(secs)
    }

    /// Proleptic Gregorian date of a Unix timestamp.
    #[allow(clippy::cast_possible_truncation)]
    fn from_unix(secs: u64) -> Self {
        let time_of_day = secs % 86_400;
        // Fits: u64::MAX / 86_400 is far below i64::MAX.
        let days = i64::try_from(secs / 86_400).unwrap_or_default();

        // Count from 0000-03-01 so the leap day closes each 400-year cycle.
        let since_march = days + 719_468;
        let cycle = since_march / 146_097;
        let day_of_cycle = since_march % 146_097;
        let year_of_cycle = (day_of_cycle - day_of_cycle / 1_460 + day_of_cycle / 36_524
            - day_of_cycle / 146_096)
            / 365;
        let day_of_year =
            day_of_cycle - (365 * year_of_cycle + year_of_cycle / 4 - year_of_cycle / 100);
        let month_from_march = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * month_from_march + 2) / 5 + 1;
        let month = if month_from_march < 10 {
            month_from_march + 3
        } else {
            month_from_march - 9
        };

        Self {
            year: cycle * 400 + year_of_cycle + i64::from(month <= 2),
            month: month as u8,
            day: day as u8,
            hour: (time_of_day / 3_600) as u8,
            minute: (time_of_day / 60 % 60) as u8,
            second: (time_of_day % 60) as u8,
        }
    }
}

impl fmt::Display for FileStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}_{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
