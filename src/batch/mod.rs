//! Batch harvesting
//!
//! [`BatchRunner`] walks a catalog sequentially, with a fixed pause after each
//! processed entry. The `harvest_*` functions wire a runner to the client, the
//! output table and the failure log described by a [`crate::Config`].

mod runner;
mod workflow;

pub use runner::{BatchReport, BatchRunner, STATEMENT_FAILURE, SUBMISSION_FAILURE};
pub use workflow::{
    harvest_statements, harvest_submissions, recovered_contests, retain_recovered_problems,
    statement_failure_log, submission_failure_log, Selection,
};
