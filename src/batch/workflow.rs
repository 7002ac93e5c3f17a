use super::runner::{BatchReport, BatchRunner};
use crate::catalog::{list_contests, list_problems, Contest, Problem, ProblemKey};
use crate::client::HarvestClient;
use crate::config::Config;
use crate::failures::{FailureLog, RecoveredEntry};
use crate::sink::{statement_sink, submission_sink};
use crate::HarvestError;
use std::collections::HashSet;

/// Which entries a workflow walks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    /// The whole catalog
    #[default]
    Catalog,
    /// Only entries found in the workflow's failure log
    RetryFailed,
}

/// Failure log of the statements workflow
pub fn statement_failure_log(config: &Config) -> FailureLog {
    FailureLog::new(&config.output.problems_log, config.output.log_format)
}

/// Failure log of the submissions workflow
pub fn submission_failure_log(config: &Config) -> FailureLog {
    FailureLog::new(&config.output.submissions_log, config.output.log_format)
}

/// Harvests problem statements into the problems table
///
/// A problem set that cannot be fetched, or comes back empty, ends the
/// workflow with an error on the console and an empty report.
pub async fn harvest_statements(
    config: &Config,
    selection: Selection,
) -> Result<BatchReport, HarvestError> {
    let client = HarvestClient::new(&config.client)?;
    let failures = statement_failure_log(config);
    let sink = statement_sink(&config.output.problems_path);

    let problems = match list_problems(&client).await {
        Ok(problems) => problems,
        Err(e) => {
            tracing::error!("Error fetching problem list: {}", e);
            return Ok(BatchReport::default());
        }
    };

    let problems = match selection {
        Selection::Catalog => problems,
        Selection::RetryFailed => {
            let recovered = failures.recover()?;
            tracing::info!(
                "Recovered {} failed problems from {}",
                recovered.len(),
                failures.path().display()
            );
            retain_recovered_problems(problems, &recovered)
        }
    };

    if problems.is_empty() {
        tracing::error!("No problems available");
        return Ok(BatchReport::default());
    }

    tracing::info!("{} problems to fetch", problems.len());
    let runner = BatchRunner::new(&client, &failures, &config.batch);
    let report = runner.run_statements(&problems, &sink).await?;
    tracing::info!("Statements done: {}", report);
    Ok(report)
}

/// Harvests per-problem submission counts into the submissions table
///
/// In retry mode the contest list is not fetched at all: the failure log is
/// the worklist.
pub async fn harvest_submissions(
    config: &Config,
    selection: Selection,
) -> Result<BatchReport, HarvestError> {
    let client = HarvestClient::new(&config.client)?;
    let failures = submission_failure_log(config);
    let sink = submission_sink(&config.output.submissions_path);

    let contests = match selection {
        Selection::Catalog => match list_contests(&client).await {
            Ok(contests) => contests,
            Err(e) => {
                tracing::error!("Failed to fetch contests: {}", e);
                return Ok(BatchReport::default());
            }
        },
        Selection::RetryFailed => {
            let recovered = failures.recover()?;
            tracing::info!(
                "Recovered {} failed contests from {}",
                recovered.len(),
                failures.path().display()
            );
            recovered_contests(&recovered)
        }
    };

    if contests.is_empty() {
        tracing::error!("No contests available");
        return Ok(BatchReport::default());
    }

    tracing::info!("{} contests in catalog", contests.len());
    let runner = BatchRunner::new(&client, &failures, &config.batch);
    let report = runner.run_submissions(&contests, &sink).await?;
    tracing::info!("Submissions done: {}", report);
    Ok(report)
}

/// Turns recovered ids into contests, dropping ids that are not numbers
pub fn recovered_contests(recovered: &[RecoveredEntry]) -> Vec<Contest> {
    recovered
        .iter()
        .filter_map(|entry| {
            let contest = entry.to_contest();
            if contest.is_none() {
                tracing::warn!("Ignoring unrecognised contest id {:?} in failure log", entry.id);
            }
            contest
        })
        .collect()
}

/// Keeps the problems whose key was recovered, in catalog order
pub fn retain_recovered_problems(problems: Vec<Problem>, recovered: &[RecoveredEntry]) -> Vec<Problem> {
    let keys: HashSet<ProblemKey> = recovered
        .iter()
        .filter_map(|entry| {
            let key = entry.to_problem_key();
            if key.is_none() {
                tracing::warn!("Ignoring unrecognised problem id {:?} in failure log", entry.id);
            }
            key
        })
        .collect();

    problems
        .into_iter()
        .filter(|problem| problem.key().is_some_and(|key| keys.contains(&key)))
        .collect()
}
