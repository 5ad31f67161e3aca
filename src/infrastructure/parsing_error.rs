//! Parsing error types
//!
//! Errors are raised only while building documents and rules. Field producers
//! never fail: a missing structure is reported as an absent value instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for '{field}': {selector} - {reason}")]
    InvalidSelector {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("Invalid base URL: {url} - {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed {
        url: String,
        reason: String,
        base_url: String,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    pub fn invalid_selector(field: &str, selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            field: field.to_string(),
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_base_url(url: &str, reason: &str) -> Self {
        Self::InvalidBaseUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn url_resolution_failed(url: &str, reason: &str, base_url: &str) -> Self {
        Self::UrlResolutionFailed {
            url: url.to_string(),
            reason: reason.to_string(),
            base_url: base_url.to_string(),
        }
    }

    pub fn configuration(field: &str, message: &str) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.to_string(),
        }
    }

    /// Whether the caller can carry on with other documents or fields.
    /// Bad selectors and configuration poison every document, so they are not.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidSelector { .. } | Self::ConfigurationError { .. } => false,
            Self::InvalidBaseUrl { .. } | Self::UrlResolutionFailed { .. } => true,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
