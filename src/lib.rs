//! cf-harvest: a patient Codeforces harvester
//!
//! This crate walks the Codeforces problem and contest catalogs one entry at a
//! time, pulls statements and submission statistics, appends them to CSV
//! tables, and keeps a failure log that a later run can replay.

pub mod batch;
pub mod catalog;
pub mod client;
pub mod config;
pub mod extract;
pub mod failures;
pub mod sink;

use thiserror::Error;

/// Main error type for cf-harvest operations
///
/// Per-entry failures never surface here: the batch runner records them and
/// moves on. What does reach the caller is either a setup problem (config,
/// HTTP client) or a fatal write to one of the output files.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Listing(#[from] ListingError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid request header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure to obtain a catalog (problem set or contest list)
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} answered with status code {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("API rejected the request: {comment}")]
    Api { comment: String },
}

/// Failure to extract the details of a single catalog entry
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Status code: {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("API rejected the request: {comment}")]
    Api { comment: String },

    #[error("problem {index} has no contest id")]
    MissingIdentifier { index: String },
}

/// Failure to append to a CSV table. Always fatal for the run.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cf-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use batch::{BatchReport, BatchRunner};
pub use catalog::{Contest, Phase, Problem, ProblemKey};
pub use config::Config;
pub use failures::{FailureLog, RecoveredEntry};
pub use sink::CsvSink;
