/// Catalog entry types decoded from the Codeforces listing endpoints
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One problem of the problem set (`problemset.problems`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Owning contest; absent for a handful of acm.sgu.ru problems
    #[serde(default)]
    pub contest_id: Option<i64>,

    /// Position inside the contest ("A", "B1", ...)
    pub index: String,

    pub name: String,

    #[serde(default)]
    pub rating: Option<u32>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Problem {
    /// Composite key, when the problem belongs to a contest
    pub fn key(&self) -> Option<ProblemKey> {
        self.contest_id
            .map(|contest_id| ProblemKey::new(contest_id, self.index.clone()))
    }

    /// Identifier used in logs: `1903/B` or just the index when there is no contest
    pub fn label(&self) -> String {
        match self.contest_id {
            Some(contest_id) => format!("{}/{}", contest_id, self.index),
            None => self.index.clone(),
        }
    }
}

/// `result` payload of `problemset.problems`
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemSet {
    pub problems: Vec<Problem>,
}

/// One contest of the contest list (`contest.list`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contest {
    pub id: i64,

    #[serde(default)]
    pub name: String,

    pub phase: Phase,
}

impl Contest {
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

/// Contest phase as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Phase {
    Before,
    Coding,
    PendingSystemTest,
    SystemTest,
    /// The only phase whose submissions are final
    Finished,
    Other(String),
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Before => "BEFORE",
            Self::Coding => "CODING",
            Self::PendingSystemTest => "PENDING_SYSTEM_TEST",
            Self::SystemTest => "SYSTEM_TEST",
            Self::Finished => "FINISHED",
            Self::Other(value) => value.as_str(),
        }
    }
}

impl From<String> for Phase {
    fn from(value: String) -> Self {
        match value.as_str() {
            "BEFORE" => Self::Before,
            "CODING" => Self::Coding,
            "PENDING_SYSTEM_TEST" => Self::PendingSystemTest,
            "SYSTEM_TEST" => Self::SystemTest,
            "FINISHED" => Self::Finished,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite problem identifier: contest id plus problem index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemKey {
    pub contest_id: i64,
    pub index: String,
}

impl ProblemKey {
    pub fn new(contest_id: i64, index: impl Into<String>) -> Self {
        Self {
            contest_id,
            index: index.into(),
        }
    }

    /// Cell value used in the submissions table, e.g. `(1903, 'B')`
    ///
    /// Matches the tuple rendering of tables produced before this tool existed,
    /// so old and new rows can live in the same file.
    pub fn table_label(&self) -> String {
        format!("({}, '{}')", self.contest_id, self.index)
    }
}

/// Log form: `1903/B`
impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.contest_id, self.index)
    }
}

impl FromStr for ProblemKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (contest, index) = s
            .split_once('/')
            .ok_or_else(|| format!("'{}' is not of the form <contest>/<index>", s))?;
        let contest_id = contest
            .parse::<i64>()
            .map_err(|e| format!("invalid contest id in '{}': {}", s, e))?;
        if index.is_empty() {
            return Err(format!("missing problem index in '{}'", s));
        }
        Ok(Self::new(contest_id, index))
    }
}
