//! Application logging
//!
//! Every entry goes to two places: an in-memory ring shown by the logs dialog,
//! and the `log` facade. When logging is enabled in the config, the facade is
//! backed by a fern dispatcher writing to `$XDG_DATA_HOME/studynotes/studynotes.log`.

use crate::constants::MAX_IN_MEMORY_LOGS;
use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Path of the log file, set once the fern dispatcher is installed
static LOG_FILE: OnceCell<PathBuf> = OnceCell::new();

/// Shared logger that can be used across the application
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<Vec<String>>>,
    enabled: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            enabled: false,
        }
    }

    /// Build a logger from the `[logging]` section.
    ///
    /// When `enabled` is true the global fern dispatcher is installed on first
    /// call; later calls reuse it.
    pub fn from_config(enabled: bool) -> Result<Self> {
        if enabled {
            init_file_logging()?;
        }

        Ok(Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            enabled,
        })
    }

    /// Whether file logging was requested
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        log::info!("{}", message);

        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(formatted_message);
            if logs.len() > MAX_IN_MEMORY_LOGS {
                let overflow = logs.len() - MAX_IN_MEMORY_LOGS;
                logs.drain(..overflow);
            }
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }

    /// Path of the log file, if file logging is active
    pub fn get_log_file_path() -> Option<PathBuf> {
        LOG_FILE.get().cloned()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

fn init_file_logging() -> Result<()> {
    LOG_FILE
        .get_or_try_init(|| -> Result<PathBuf> {
            let dir = dirs::data_dir()
                .context("Could not determine data directory")?
                .join("studynotes");
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let path = dir.join("studynotes.log");

            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{} {} {}] {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(log::LevelFilter::Debug)
                .level_for("reqwest", log::LevelFilter::Info)
                .level_for("hyper_util", log::LevelFilter::Warn)
                .level_for("rustls", log::LevelFilter::Warn)
                .chain(fern::log_file(&path).with_context(|| format!("Failed to open log file: {}", path.display()))?)
                .apply()
                .context("A global logger is already installed")?;

            Ok(path)
        })
        .map(|_| ())
}
