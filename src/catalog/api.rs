//! Listing calls against the Codeforces API
//!
//! Each call is a single GET with no retry. Any failure comes back as a
//! `ListingError`; deciding what an absent catalog means is up to the caller.

use crate::catalog::types::{Contest, Problem, ProblemSet};
use crate::client::HarvestClient;
use crate::ListingError;

/// Fetches the whole problem set
pub async fn list_problems(client: &HarvestClient) -> Result<Vec<Problem>, ListingError> {
    let url = client.problemset_url();
    let problem_set: ProblemSet = client
        .get_api(&url)
        .await
        .map_err(|failure| ListingError::from_failure(&url, failure))?;

    tracing::info!("Fetched {} problems", problem_set.problems.len());
    Ok(problem_set.problems)
}

/// Fetches every contest, in the order the API lists them (newest first)
pub async fn list_contests(client: &HarvestClient) -> Result<Vec<Contest>, ListingError> {
    let url = client.contest_list_url();
    let contests: Vec<Contest> = client
        .get_api(&url)
        .await
        .map_err(|failure| ListingError::from_failure(&url, failure))?;

    tracing::info!("Fetched {} contests", contests.len());
    Ok(contests)
}
