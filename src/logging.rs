//! Logging for the overlay.
//!
//! Every `log` record goes to an `env_logger` console logger (filtered by
//! `RUST_LOG`) and, once a log directory is known, to a daily log file with
//! size-based rotation and cleanup.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use log::{Log, Metadata, Record};

use crate::error::{LockResultExt, OverlayResult};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

const LOG_PREFIX: &str = "game-overlay";

/// Install the global logger. `log_dir` enables the file sink; `verbose`
/// lowers the default level to debug (`RUST_LOG` still wins).
///
/// Fails if a logger is already installed.
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> OverlayResult<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let console =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .build();

    let file = match log_dir {
        Some(dir) => Some(FileSink::open(dir)?),
        None => None,
    };

    let max_level = console.filter();
    log::set_boxed_logger(Box::new(OverlayLogger { console, file }))
        .map_err(|e| format!("Failed to install logger: {}", e))?;
    log::set_max_level(max_level);

    log::info!("[LOGGING] Logging initialized");
    if let Some(dir) = log_dir {
        log::info!("[LOGGING] Log directory: {}", dir.display());
    }
    Ok(())
}

struct OverlayLogger {
    console: env_logger::Logger,
    file: Option<FileSink>,
}

impl Log for OverlayLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.console.matches(record) {
            return;
        }
        self.console.log(record);

        if let Some(file) = &self.file {
            // A broken log file must never take the app down
            let _ = file.write_line(record.level(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        self.console.flush();
    }
}

// ============================================================================
// File Sink
// ============================================================================

/// Appends to `game-overlay_YYYY-MM-DD.log`, rotating past a size limit.
pub struct FileSink {
    dir: PathBuf,
    max_size: u64,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(dir: &Path) -> OverlayResult<Self> {
        Self::with_max_size(dir, MAX_LOG_SIZE)
    }

    fn with_max_size(dir: &Path, max_size: u64) -> OverlayResult<Self> {
        fs::create_dir_all(dir)?;
        let file = open_append(&current_log_path(dir))?;
        cleanup_old_logs(dir);

        Ok(Self {
            dir: dir.to_path_buf(),
            max_size,
            file: Mutex::new(file),
        })
    }

    pub fn write_line(&self, level: log::Level, target: &str, message: &str) -> OverlayResult<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = format!("[{}] [{}] [{}] {}\n", timestamp, level, target, message);

        let mut file = self.file.lock().map_lock_err("log file")?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        if file.metadata()?.len() > self.max_size {
            *file = self.rotate()?;
        }
        Ok(())
    }

    /// Move the current file aside and start a fresh one.
    fn rotate(&self) -> OverlayResult<File> {
        let current = current_log_path(&self.dir);
        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S%.3f");
        let rotated = self
            .dir
            .join(format!("{}_{}.log", LOG_PREFIX, timestamp));
        fs::rename(&current, &rotated)?;

        let file = open_append(&current)?;
        cleanup_old_logs(&self.dir);
        Ok(file)
    }
}

fn open_append(path: &Path) -> OverlayResult<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Path of today's log file.
fn current_log_path(dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    dir.join(format!("{}_{}.log", LOG_PREFIX, date))
}

/// Keep only the MAX_LOG_FILES most recently modified log files.
fn cleanup_old_logs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.starts_with(LOG_PREFIX) && name.ends_with(".log")
        })
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for file in log_files.into_iter().skip(MAX_LOG_FILES) {
        let _ = fs::remove_file(file.path());
    }
}
