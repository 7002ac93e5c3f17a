//! Submission statistics for one contest
//!
//! `contest.status` lists every submission of a contest. We fold that list into
//! per-problem counters: how many submissions there were and how many of them
//! were accepted.

use crate::catalog::ProblemKey;
use crate::client::HarvestClient;
use crate::ExtractionError;
use serde::Deserialize;
use std::collections::HashMap;

/// Verdict of an accepted submission
pub const ACCEPTED_VERDICT: &str = "OK";

/// One entry of `contest.status`, reduced to what the counters need
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub problem: SubmittedProblem,

    /// Absent while the submission is still being judged
    #[serde(default)]
    pub verdict: Option<String>,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.verdict.as_deref() == Some(ACCEPTED_VERDICT)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedProblem {
    #[serde(default)]
    pub contest_id: Option<i64>,
    pub index: String,
}

/// Accepted and total submissions of one problem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub accepted: u64,
    pub total: u64,
}

/// Per-problem tallies in the order problems were first seen
///
/// Adding to a key that already exists sums into it, so results from several
/// pages of the same contest can be merged safely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionCounts {
    order: Vec<ProblemKey>,
    tallies: HashMap<ProblemKey, Tally>,
}

impl SubmissionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one submission
    pub fn record(&mut self, key: ProblemKey, accepted: bool) {
        self.add(
            key,
            Tally {
                accepted: u64::from(accepted),
                total: 1,
            },
        );
    }

    /// Adds a tally to a key, creating the key if it is new
    pub fn add(&mut self, key: ProblemKey, tally: Tally) {
        match self.tallies.get_mut(&key) {
            Some(existing) => {
                existing.accepted += tally.accepted;
                existing.total += tally.total;
            }
            None => {
                self.order.push(key.clone());
                self.tallies.insert(key, tally);
            }
        }
    }

    /// Sums another set of counts into this one
    pub fn merge(&mut self, other: SubmissionCounts) {
        let SubmissionCounts { order, mut tallies } = other;
        for key in order {
            if let Some(tally) = tallies.remove(&key) {
                self.add(key, tally);
            }
        }
    }

    pub fn get(&self, key: &ProblemKey) -> Option<Tally> {
        self.tallies.get(key).copied()
    }

    pub fn accepted(&self, key: &ProblemKey) -> u64 {
        self.get(key).map_or(0, |tally| tally.accepted)
    }

    pub fn total(&self, key: &ProblemKey) -> u64 {
        self.get(key).map_or(0, |tally| tally.total)
    }

    /// Number of distinct problems seen
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys with their tallies, first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&ProblemKey, Tally)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.tallies.get(key).map(|tally| (key, *tally)))
    }
}

/// Folds a submission list into per-problem counts
///
/// Submissions whose problem carries no contest id are attributed to
/// `contest_id`, the contest being queried.
pub fn tally_submissions(contest_id: i64, submissions: &[Submission]) -> SubmissionCounts {
    let mut counts = SubmissionCounts::new();
    for submission in submissions {
        let key = ProblemKey::new(
            submission.problem.contest_id.unwrap_or(contest_id),
            submission.problem.index.clone(),
        );
        counts.record(key, submission.is_accepted());
    }
    counts
}

/// Downloads every submission of a contest and counts them per problem
///
/// # Returns
///
/// * `Ok(SubmissionCounts)` - Possibly empty when the contest had no submissions
/// * `Err(ExtractionError)` - Request failed, non-2xx status, or the payload
///   could not be decoded
pub async fn fetch_submission_counts(
    client: &HarvestClient,
    contest_id: i64,
) -> Result<SubmissionCounts, ExtractionError> {
    let url = client.contest_status_url(contest_id);
    let submissions: Vec<Submission> = client
        .get_api(&url)
        .await
        .map_err(|failure| ExtractionError::from_failure(&url, failure))?;

    tracing::info!(
        "Fetched {} submissions for contest {}",
        submissions.len(),
        contest_id
    );

    Ok(tally_submissions(contest_id, &submissions))
}
