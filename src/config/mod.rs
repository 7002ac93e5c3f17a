//! Configuration module for cf-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the harvester also runs without a file.
//!
//! # Example
//!
//! ```no_run
//! use cf_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Fetching from: {}", config.client.base_url);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    BatchConfig, ClientConfig, Config, LogFormat, OutputConfig, DEFAULT_BASE_URL,
    DEFAULT_USER_AGENT,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
