use crate::config::LogFormat;
use chrono::{Local, Utc};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Severity written into every failure line
pub const FAILURE_LEVEL: &str = "ERROR";

/// Append-only log of entries that could not be harvested
///
/// Created once per run and handed to the batch runner. The file is created
/// on the first failure; a clean run leaves no file behind.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
    format: LogFormat,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>, format: LogFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Appends one failure line
    ///
    /// `subject` describes what failed and must not contain `". "`; the
    /// identifier follows it so that it is the last token before the first
    /// `". "` of the message, e.g.
    /// `Failed to fetch submissions for contest 42. Status code: 503`.
    pub fn record(&self, subject: &str, id: &str, error: &dyn fmt::Display) -> io::Result<()> {
        let message = single_line(&format!("{} {}. {}", subject, id, error));
        let line = match self.format {
            LogFormat::Plain => format!(
                "{} - {} - {}\n",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                FAILURE_LEVEL,
                message
            ),
            LogFormat::KeyValue => format!(
                "ts={} level={} id={} msg=\"{}\"\n",
                Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                FAILURE_LEVEL,
                single_token(id),
                message.replace('\\', "\\\\").replace('"', "\\\"")
            ),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

/// One failure is one line
fn single_line(message: &str) -> String {
    message.replace(['\r', '\n'], " ")
}

fn single_token(id: &str) -> String {
    id.split_whitespace().collect::<Vec<_>>().join("_")
}
