//! Detail extractors
//!
//! This module turns one catalog entry into its detail record:
//! - a problem into its statement text (HTML page)
//! - a contest into per-problem submission counts (JSON API)
//!
//! Extractors return `Result`; recording and skipping failures is the batch
//! runner's job.

mod statement;
mod submissions;

pub use statement::{fetch_statement, parse_statement, StatementRecord, SECTION_SEPARATOR};
pub use submissions::{
    fetch_submission_counts, tally_submissions, Submission, SubmissionCounts, SubmittedProblem,
    Tally, ACCEPTED_VERDICT,
};
