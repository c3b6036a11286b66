//! Error types for the paper curation pipeline.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors from a source adapter or its HTTP layer.
///
/// These never abort a batch: the aggregator records them in per-source stats
/// and moves on to the next source.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the upstream API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from the API
        message: String,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl SourceError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if retrying the whole adapter call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout(_) | Self::Server { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// Errors from the pipeline itself.
///
/// Only configuration corruption is fatal; everything else in the pipeline
/// degrades (dropped candidates, ambiguity flags, zeroed sub-scores) rather
/// than erroring.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Configuration failed validation at startup
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What failed validation
        message: String,
    },

    /// A candidate record failed ingestion validation
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON serialization error while rendering a report
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Returns true if this error must abort the run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

/// Result type alias for source adapter operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_retryable() {
        assert!(SourceError::rate_limited(60).is_retryable());
        assert!(SourceError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(SourceError::server(500, "Internal error").is_retryable());

        assert!(!SourceError::not_found("work/123").is_retryable());
        assert!(!SourceError::bad_request("invalid query").is_retryable());
    }

    #[test]
    fn test_source_error_retry_after() {
        let err = SourceError::rate_limited(60);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = SourceError::not_found("work");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_pipeline_error_fatality() {
        assert!(PipelineError::invalid_config("weights sum to zero").is_fatal());
        assert!(!PipelineError::validation("title", "below minimum length").is_fatal());
    }

    #[test]
    fn test_validation_error_message() {
        let err = PipelineError::validation("title", "cannot be empty");
        assert!(err.to_string().contains("cannot be empty"));
    }
}
