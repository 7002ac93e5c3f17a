//! Catalog module: what there is to harvest
//!
//! Problems come from `problemset.problems`, contests from `contest.list`.
//! Both are fetched once per run and never mutated afterwards.

mod api;
mod types;

pub use api::{list_contests, list_problems};
pub use types::{Contest, Phase, Problem, ProblemKey, ProblemSet};
