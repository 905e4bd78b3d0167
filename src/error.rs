/// Error types for the edit workflow
///
/// Every failure that can end a submission is an `EditError`. The
/// `Display` text is exactly what the user sees in the error line.
use thiserror::Error;

/// Message shown when the submit action is triggered without an image or prompt
pub const MISSING_INPUT_MESSAGE: &str = "Please upload an image and provide an editing prompt.";

/// Fallback when a failed response carries no usable `error` field
pub const GENERIC_API_ERROR: &str = "An API error occurred.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditError {
    /// Input rejected before anything touches the network
    #[error("{0}")]
    Validation(String),

    /// The edit service answered with a non-success status
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The request could not be completed (connection refused, reset, ...)
    #[error("{0}")]
    Transport(String),

    /// A success status whose body is not an image
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl EditError {
    pub fn missing_input() -> Self {
        EditError::Validation(MISSING_INPUT_MESSAGE.to_string())
    }

    /// Short label for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            EditError::Validation(_) => "validation",
            EditError::Remote { .. } => "remote",
            EditError::Transport(_) => "transport",
            EditError::MalformedResponse(_) => "malformed-response",
        }
    }
}

impl From<reqwest::Error> for EditError {
    fn from(err: reqwest::Error) -> Self {
        EditError::Transport(err.to_string())
    }
}
