//! logging.rs
//! Timestamped free-text status lines for the pipeline.
//!
//! Design notes:
//! - The logger is a cheap cloneable handle over a shared line buffer,
//!   so the processor, coordinator, and cleanup registry all write to
//!   the same session log.
//! - Lines stay inspectable in memory (external collaborators render
//!   them); optional stderr echo for interactive runs.
//! - Key material and passphrases are never logged.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// One timestamped status line.
#[derive(Debug, Clone, Serialize)]
pub struct LogLine {
    pub at: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn render(&self) -> String {
        format!(
            "[{}] {} {}",
            self.at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.level.as_str(),
            self.message
        )
    }
}

/// Shared session logger.
#[derive(Clone)]
pub struct Logger {
    lines: Arc<Mutex<Vec<LogLine>>>,
    echo: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
            echo: false,
        }
    }

    /// Logger that also echoes each line to stderr.
    pub fn with_echo() -> Self {
        Self {
            echo: true,
            ..Self::new()
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    fn push(&self, level: LogLevel, message: String) {
        let line = LogLine {
            at: Utc::now(),
            level,
            message,
        };
        if self.echo {
            eprintln!("{}", line.render());
        }
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }

    /// Snapshot of all lines logged so far.
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of lines whose message contains `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .map(|lines| {
                lines
                    .iter()
                    .filter(|line| line.message.contains(needle))
                    .count()
            })
            .unwrap_or(0)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
