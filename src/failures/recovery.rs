//! Rebuilding a retry worklist from a failure log
//!
//! Plain logs are scraped textually: the identifier is the last space-separated
//! token before the first `". "` of the line. This only works as long as the
//! writer keeps that layout, which is why [`super::FailureLog::record`] puts
//! the identifier there. Key-value logs carry the identifier in an `id=` field.

use crate::catalog::{Contest, Phase, ProblemKey};
use crate::config::LogFormat;
use std::io;
use std::path::Path;

/// An identifier recovered from a failure log, ready to be resubmitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredEntry {
    pub id: String,
    /// Always [`Phase::Finished`], so the statistics runner does not skip it
    pub phase: Phase,
}

impl RecoveredEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            phase: Phase::Finished,
        }
    }

    /// Contest to resubmit; `None` when the id is not a contest number
    pub fn to_contest(&self) -> Option<Contest> {
        self.id.parse::<i64>().ok().map(|id| Contest {
            id,
            name: String::new(),
            phase: self.phase.clone(),
        })
    }

    /// Problem key (`1903/B`) to resubmit; `None` when the id has another shape
    pub fn to_problem_key(&self) -> Option<ProblemKey> {
        self.id.parse().ok()
    }
}

/// Reads a failure log and returns one entry per line
///
/// A missing file means nothing failed and yields an empty list. Lines are not
/// deduplicated; a line that does not follow the expected layout yields
/// whatever token sits in the identifier position.
pub fn recover_failed_ids(path: &Path, format: LogFormat) -> io::Result<Vec<RecoveredEntry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let entries = content
        .lines()
        .map(|line| match format {
            LogFormat::Plain => id_from_plain_line(line),
            LogFormat::KeyValue => id_from_key_value_line(line),
        })
        .map(RecoveredEntry::new)
        .collect();

    Ok(entries)
}

/// `... contest 42. Status code: 503` -> `42`
pub fn id_from_plain_line(line: &str) -> String {
    let head = line.split(". ").next().unwrap_or_default();
    head.split(' ').last().unwrap_or_default().trim().to_string()
}

/// `ts=... level=ERROR id=42 msg="..."` -> `42`
///
/// Falls back to the plain convention when there is no `id=` field.
pub fn id_from_key_value_line(line: &str) -> String {
    line.split(' ')
        .take_while(|token| !token.starts_with("msg="))
        .find_map(|token| token.strip_prefix("id="))
        .map(|id| id.trim().to_string())
        .unwrap_or_else(|| id_from_plain_line(line))
}
