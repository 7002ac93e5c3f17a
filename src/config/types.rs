use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://codeforces.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// Main configuration structure for cf-harvest
///
/// Every section is optional; an empty file (or no file at all) yields the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote endpoint and the fixed header set sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Site root; API and problem paths are resolved against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    #[serde(rename = "accept-encoding")]
    pub accept_encoding: String,

    pub referer: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: "text/html".to_string(),
            accept_language: "en-GB,en-US;q=0.9,en;q=0.8".to_string(),
            accept_encoding: "gzip".to_string(),
            referer: "https://www.google.com/".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Batch loop pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Pause after every processed entry (milliseconds)
    #[serde(rename = "rate-limit-ms")]
    pub rate_limit_ms: u64,

    /// Only walk this many catalog entries from the front
    #[serde(rename = "max-items")]
    pub max_items: Option<usize>,
}

impl BatchConfig {
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: 5_000,
            max_items: None,
        }
    }
}

/// Output files
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV table receiving problem statements
    #[serde(rename = "problems-path")]
    pub problems_path: PathBuf,

    /// CSV table receiving per-problem submission counts
    #[serde(rename = "submissions-path")]
    pub submissions_path: PathBuf,

    /// Failure log of the statements workflow
    #[serde(rename = "problems-log")]
    pub problems_log: PathBuf,

    /// Failure log of the submissions workflow
    #[serde(rename = "submissions-log")]
    pub submissions_log: PathBuf,

    #[serde(rename = "log-format")]
    pub log_format: LogFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            problems_path: PathBuf::from("problems.csv"),
            submissions_path: PathBuf::from("problem_submissions.csv"),
            problems_log: PathBuf::from("error.log"),
            submissions_log: PathBuf::from("error_submission.log"),
            log_format: LogFormat::Plain,
        }
    }
}

/// Line format of the failure logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// `timestamp - LEVEL - message`
    #[default]
    Plain,
    /// `ts=... level=... id=... msg="..."`
    KeyValue,
}
