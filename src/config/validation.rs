use crate::config::types::{BatchConfig, ClientConfig, Config, OutputConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use url::Url;

/// Longest pause between entries we accept (ten minutes)
const MAX_RATE_LIMIT_MS: u64 = 600_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_batch_config(&config.batch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the remote endpoint and request headers
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    for (name, value) in [
        ("user-agent", &config.user_agent),
        ("accept", &config.accept),
        ("accept-language", &config.accept_language),
        ("accept-encoding", &config.accept_encoding),
        ("referer", &config.referer),
    ] {
        validate_header_value(name, value)?;
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_header_value(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }

    HeaderValue::from_str(value).map_err(|_| {
        ConfigError::Validation(format!("{} is not a valid header value: '{}'", name, value))
    })?;

    Ok(())
}

/// Validates batch pacing
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.rate_limit_ms > MAX_RATE_LIMIT_MS {
        return Err(ConfigError::Validation(format!(
            "rate-limit-ms must be <= {}ms, got {}ms",
            MAX_RATE_LIMIT_MS, config.rate_limit_ms
        )));
    }

    if config.max_items == Some(0) {
        return Err(ConfigError::Validation(
            "max-items must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, path) in [
        ("problems-path", &config.problems_path),
        ("submissions-path", &config.submissions_path),
        ("problems-log", &config.problems_log),
        ("submissions-log", &config.submissions_log),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.problems_log == config.submissions_log {
        return Err(ConfigError::Validation(
            "problems-log and submissions-log must be different files".to_string(),
        ));
    }

    Ok(())
}
