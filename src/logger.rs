use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;
use crate::constants::LOG_TIMESTAMP_FORMAT;

/// Recent log lines kept in memory so a front end can show them.
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<Vec<String>>>,
    capacity: usize,
}

impl Logger {
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            capacity: capacity.max(1),
        }
    }

    /// Add a log entry, dropping the oldest one when full
    pub fn log(&self, message: String) {
        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() >= self.capacity {
                logs.remove(0);
            }
            logs.push(message);
        }
    }

    /// Get all logs, newest first
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

    /// Build the fern dispatcher for `config` without installing it.
    ///
    /// Records always go to this logger's memory buffer; they also go to the
    /// log file when logging is enabled. Database driver output is capped at
    /// `warn` so statement traces don't drown the crate's own messages.
    pub fn dispatch(&self, config: &LoggingConfig) -> Result<fern::Dispatch> {
        let level = config.level_filter()?;
        let memory = self.clone();

        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    Local::now().format(LOG_TIMESTAMP_FORMAT),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(level)
            .level_for("sea_orm", LevelFilter::Warn)
            .level_for("sqlx", LevelFilter::Warn)
            .chain(fern::Output::call(move |record| memory.log(record.args().to_string())));

        if config.enabled {
            let path = config.resolve_file()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = fern::log_file(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            dispatch = dispatch.chain(file);
        }

        Ok(dispatch)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the global logger described by `config`.
///
/// Fails if a global logger is already installed.
pub fn init(config: &LoggingConfig) -> Result<Logger> {
    let logger = Logger::new();
    logger
        .dispatch(config)?
        .apply()
        .context("Failed to install logger")?;
    Ok(logger)
}
