//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the ledger endpoint is an absolute http(s) URL
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "ledger.api_url").
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.ledger.api_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "ledger.api_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "ledger.api_url",
            format!("invalid URL '{}': {}", config.ledger.api_url, e),
        )),
    }

    if config.ledger.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "ledger.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.ledger.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "ledger.connect_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.output.path.file_name().is_none() {
        errors.push(ValidationError::new(
            "output.path",
            format!("'{}' does not name a file", config.output.path.display()),
        ));
    }

    if config.portal.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "portal.bind_address",
            format!("'{}' is not a socket address", config.portal.bind_address),
        ));
    }

    if config.portal.max_upload_bytes == 0 {
        errors.push(ValidationError::new(
            "portal.max_upload_bytes",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
