use crate::catalog::{Contest, Problem};
use crate::client::HarvestClient;
use crate::config::BatchConfig;
use crate::extract::{fetch_statement, fetch_submission_counts};
use crate::failures::FailureLog;
use crate::sink::{submission_rows, CsvSink, StatementRow};
use crate::HarvestError;
use std::fmt;
use std::time::Duration;

/// Failure-log subject of the statements workflow
pub const STATEMENT_FAILURE: &str = "Failed to fetch statement for problem";

/// Failure-log subject of the submissions workflow
pub const SUBMISSION_FAILURE: &str = "Failed to fetch submissions for contest";

/// What happened during one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entries handed to an extractor
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Entries passed over without a request (contests not yet finished)
    pub skipped: usize,
    pub rows_written: usize,
    /// Number of pauses taken between entries
    pub delays: usize,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed ({} succeeded, {} failed), {} skipped, {} rows written",
            self.processed, self.succeeded, self.failed, self.skipped, self.rows_written
        )
    }
}

/// Walks a catalog one entry at a time
///
/// Every processed entry is followed by a fixed pause, whether it succeeded
/// or not. A failing entry is reported to the console and to the failure log
/// and the walk goes on; only a failed write to the table or to the failure
/// log ends the batch early.
pub struct BatchRunner<'a> {
    client: &'a HarvestClient,
    failures: &'a FailureLog,
    rate_limit: Duration,
    max_items: Option<usize>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(client: &'a HarvestClient, failures: &'a FailureLog, batch: &BatchConfig) -> Self {
        Self {
            client,
            failures,
            rate_limit: batch.rate_limit(),
            max_items: batch.max_items,
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_max_items(mut self, max_items: Option<usize>) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn failure_log(&self) -> &FailureLog {
        self.failures
    }

    /// Fetches the statement of every problem and appends one row per success
    pub async fn run_statements(
        &self,
        problems: &[Problem],
        sink: &CsvSink,
    ) -> Result<BatchReport, HarvestError> {
        let window = self.window(problems);
        let total = window.len();
        let mut report = BatchReport::default();

        for (position, problem) in window.iter().enumerate() {
            let label = problem.label();
            tracing::info!(
                "Fetching problem {} {} ({} of {})",
                label,
                problem.name,
                position + 1,
                total
            );
            report.processed += 1;

            match fetch_statement(self.client, problem).await {
                Ok(record) => {
                    report.rows_written += sink.append([StatementRow::from(&record)])?;
                    report.succeeded += 1;
                    tracing::info!("Problem {} fetched successfully", label);
                }
                Err(e) => {
                    tracing::error!("Error processing problem {}: {}", label, e);
                    self.failures.record(STATEMENT_FAILURE, &label, &e)?;
                    report.failed += 1;
                }
            }

            self.pause(&mut report).await;
        }

        Ok(report)
    }

    /// Counts submissions of every finished contest and appends one row per
    /// problem seen
    pub async fn run_submissions(
        &self,
        contests: &[Contest],
        sink: &CsvSink,
    ) -> Result<BatchReport, HarvestError> {
        let window = self.window(contests);
        let total = window.len();
        let mut report = BatchReport::default();

        for (position, contest) in window.iter().enumerate() {
            if !contest.is_finished() {
                tracing::debug!("Skipping contest {} (phase {})", contest.id, contest.phase);
                report.skipped += 1;
                continue;
            }

            tracing::info!(
                "Processing contest {} ({} of {})",
                contest.id,
                position + 1,
                total
            );
            report.processed += 1;

            match fetch_submission_counts(self.client, contest.id).await {
                Ok(counts) => {
                    let written = sink.append(submission_rows(&counts))?;
                    report.rows_written += written;
                    report.succeeded += 1;
                    tracing::info!(
                        "Submission counts saved for contest {} ({} problems)",
                        contest.id,
                        written
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to fetch submissions for contest {}: {}", contest.id, e);
                    self.failures
                        .record(SUBMISSION_FAILURE, &contest.id.to_string(), &e)?;
                    report.failed += 1;
                }
            }

            self.pause(&mut report).await;
        }

        Ok(report)
    }

    fn window<'e, T>(&self, entries: &'e [T]) -> &'e [T] {
        match self.max_items {
            Some(limit) if limit < entries.len() => &entries[..limit],
            _ => entries,
        }
    }

    async fn pause(&self, report: &mut BatchReport) {
        tracing::debug!("Waiting {:?} before the next entry", self.rate_limit);
        tokio::time::sleep(self.rate_limit).await;
        report.delays += 1;
    }
}
