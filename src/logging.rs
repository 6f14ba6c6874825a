//! Frontend-visible logging
//! Mirrors every log record to stderr and forwards it to the frontend as a
//! `log-message` event, so the UI can show a live diagnostics pane.

use std::sync::OnceLock;

use chrono::Local;
use log::{Level, Metadata, Record, SetLoggerError};
use serde::Serialize;
use tauri::Emitter;

static LOGGER: OnceLock<TauriLogger> = OnceLock::new();

#[derive(Debug, Serialize, Clone)]
pub struct LogMessage {
    level: String,
    message: String,
    timestamp: String,
}

pub struct TauriLogger {
    app_handle: tauri::AppHandle,
    level: Level,
}

impl TauriLogger {
    pub fn new(app_handle: tauri::AppHandle, level: Level) -> Self {
        Self { app_handle, level }
    }

    pub fn init(app_handle: tauri::AppHandle, level: Level) -> Result<(), SetLoggerError> {
        let logger = LOGGER.get_or_init(|| TauriLogger::new(app_handle, level));
        log::set_logger(logger).map(|()| log::set_max_level(level.to_level_filter()))
    }

    fn emit_log(&self, record: &Record) {
        let log_message = LogMessage {
            level: record.level().to_string(),
            message: record.args().to_string(),
            timestamp: Local::now().to_rfc3339(),
        };

        if let Err(e) = self.app_handle.emit("log-message", log_message) {
            eprintln!("Failed to emit log message: {}", e);
        }
    }
}

impl log::Log for TauriLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
            self.emit_log(record);
        }
    }

    fn flush(&self) {}
}
