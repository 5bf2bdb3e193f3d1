//! Error types for the sprint planner service.

use thiserror::Error;

/// Top-level error type for store, planner, and HTTP operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The team-data document is missing, unreadable, or not valid JSON.
    #[error("Failed to load team data: {0}")]
    DataUnavailable(String),

    /// Writing the team-data document failed.
    #[error("Failed to save team data: {0}")]
    WriteFailure(String),

    /// The completion API could not produce a plan.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Team data cannot be planned (e.g. zero velocity).
    #[error("Invalid team data: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures contacting the completion API or decoding its answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// HTTP 402 from the API.
    #[error("DeepSeek API error: insufficient credits")]
    InsufficientCredits,

    /// HTTP 401 from the API.
    #[error("DeepSeek API error: invalid credentials")]
    InvalidCredentials,

    /// No API key configured, so no request was sent.
    #[error("DeepSeek API key is not configured")]
    MissingApiKey,

    /// Any other non-success status.
    #[error("DeepSeek API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection, TLS, or timeout failure.
    #[error("DeepSeek request failed: {0}")]
    Transport(String),

    /// The answer had no usable content or the content was not JSON.
    #[error("DeepSeek response could not be parsed: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_wraps_transparently() {
        let err: PlannerError = RemoteError::InsufficientCredits.into();
        assert_eq!(err.to_string(), "DeepSeek API error: insufficient credits");
    }

    #[test]
    fn test_data_unavailable_message_wraps_cause() {
        let err = PlannerError::DataUnavailable("No such file or directory".to_string());
        assert!(err.to_string().contains("No such file or directory"));
    }
}
