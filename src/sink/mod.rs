//! Tabular output
//!
//! Two append-only CSV tables:
//! - problems: `contest_id, problem_index, problem_name, problem_rating,
//!   problem_tags, problem_statement`, never a header row
//! - submissions: `problem, accepted_count, total_count`, header written when
//!   the file is first created

mod csv_sink;

pub use csv_sink::{CsvSink, HeaderPolicy};

use crate::catalog::ProblemKey;
use crate::extract::{StatementRecord, SubmissionCounts, Tally};
use serde::Serialize;

/// Column names of the problems table, for operators seeding a header
pub const STATEMENT_COLUMNS: [&str; 6] = [
    "contest_id",
    "problem_index",
    "problem_name",
    "problem_rating",
    "problem_tags",
    "problem_statement",
];

/// One row of the problems table
#[derive(Debug, Serialize)]
pub struct StatementRow<'a> {
    pub contest_id: Option<i64>,
    pub problem_index: &'a str,
    pub problem_name: &'a str,
    pub problem_rating: Option<u32>,
    pub problem_tags: String,
    pub problem_statement: &'a str,
}

impl<'a> From<&'a StatementRecord> for StatementRow<'a> {
    fn from(record: &'a StatementRecord) -> Self {
        Self {
            contest_id: record.problem.contest_id,
            problem_index: &record.problem.index,
            problem_name: &record.problem.name,
            problem_rating: record.problem.rating,
            problem_tags: format_tags(&record.problem.tags),
            problem_statement: &record.statement,
        }
    }
}

/// One row of the submissions table
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionRow {
    pub problem: String,
    pub accepted_count: u64,
    pub total_count: u64,
}

impl SubmissionRow {
    pub fn new(key: &ProblemKey, tally: Tally) -> Self {
        Self {
            problem: key.table_label(),
            accepted_count: tally.accepted,
            total_count: tally.total,
        }
    }
}

/// Rows for one contest, first-seen order
pub fn submission_rows(counts: &SubmissionCounts) -> Vec<SubmissionRow> {
    counts
        .iter()
        .map(|(key, tally)| SubmissionRow::new(key, tally))
        .collect()
}

/// Renders tags as a list literal: `['dp', 'math']`
///
/// Same cell format as problem tables written before this tool existed.
pub fn format_tags(tags: &[String]) -> String {
    let quoted: Vec<String> = tags.iter().map(|tag| format!("'{}'", tag)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Sink for the problems table
pub fn statement_sink(path: impl Into<std::path::PathBuf>) -> CsvSink {
    CsvSink::new(path, HeaderPolicy::Never)
}

/// Sink for the submissions table
pub fn submission_sink(path: impl Into<std::path::PathBuf>) -> CsvSink {
    CsvSink::new(path, HeaderPolicy::IfAbsent)
}
