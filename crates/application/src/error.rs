//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The departure fetch could not complete
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The response body was not valid JSON or had no departures array
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A departure time was not a valid ISO-8601 local timestamp
    #[error("Invalid departure time '{value}': {reason}")]
    TimestampParseFailure {
        /// The offending input
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// Only network failures can heal by themselves before the next poll.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkFailure(_))
    }

    /// Short machine-readable kind, used as a log field
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::NetworkFailure(_) => "network_failure",
            Self::MalformedResponse(_) => "malformed_response",
            Self::TimestampParseFailure { .. } => "timestamp_parse_failure",
            Self::Configuration(_) => "configuration",
        }
    }
}
