//! Structured logging for the analytics pipeline.
//!
//! Provides context-rich logging with pipeline-stage tags, optional country
//! identifiers, timestamps, and severity levels. Supports both console
//! output and file-based logging for batch runs. Logging is entirely
//! optional: if `init_logger` is never called, every log call is a no-op,
//! which keeps the analytical operations pure for library users.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// Which part of the pipeline a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Load,
    Peaks,
    Bucketing,
    Flows,
    Population,
    System,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Load => write!(f, "LOAD"),
            PipelineStage::Peaks => write!(f, "PEAKS"),
            PipelineStage::Bucketing => write!(f, "BUCKET"),
            PipelineStage::Flows => write!(f, "FLOWS"),
            PipelineStage::Population => write!(f, "POP"),
            PipelineStage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger { min_level, log_file };
        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, stage: PipelineStage, country: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let country_part = country.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let log_entry = format!("{} {} {}{}: {}", timestamp, level, stage, country_part, message);

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
            LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(stage: PipelineStage, country: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, stage, country, message);
    }
}

/// Log a warning message
pub fn warn(stage: PipelineStage, country: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, stage, country, message);
    }
}

/// Log an error message
pub fn error(stage: PipelineStage, country: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, stage, country, message);
    }
}

/// Log a debug message
pub fn debug(stage: PipelineStage, country: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, stage, country, message);
    }
}

// ---------------------------------------------------------------------------
// Join Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a join that may exclude rows, such as the population
/// join dropping countries absent from the population table.
pub fn log_join_summary(stage: PipelineStage, total: usize, joined: usize, dropped: usize) {
    let message = format!("join complete: {}/{} joined, {} dropped", joined, total, dropped);

    if dropped == 0 {
        info(stage, None, &message);
    } else if joined == 0 {
        warn(stage, None, &message);
    } else {
        debug(stage, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_stage_display_tags_are_distinct() {
        let stages = [
            PipelineStage::Load,
            PipelineStage::Peaks,
            PipelineStage::Bucketing,
            PipelineStage::Flows,
            PipelineStage::Population,
            PipelineStage::System,
        ];
        let mut seen = std::collections::HashSet::new();
        for stage in stages {
            assert!(seen.insert(stage.to_string()), "duplicate tag for {:?}", stage);
        }
    }

    #[test]
    fn test_logging_without_init_is_a_noop() {
        // Must not panic or block when no logger has been installed.
        debug(PipelineStage::System, None, "no logger installed");
    }
}
