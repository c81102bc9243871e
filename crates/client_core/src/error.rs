use reqwest::StatusCode;
use shared::error::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid label service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("label service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("label service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ServiceError {
    /// Text to show the annotator: the server's response body when it sent
    /// one, otherwise the error itself.
    pub fn detail(&self) -> String {
        match self {
            ServiceError::Status { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadRange,
    SaveLabel,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::LoadRange => f.write_str("load range"),
            Action::SaveLabel => f.write_str("save"),
        }
    }
}

/// Failures surfaced to the annotator by the range session controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{0}")]
    InvalidRange(#[from] DomainError),
    #[error("Failed to load range")]
    LoadFailed(#[source] ServiceError),
    #[error("Save failed: {message}")]
    SaveFailed { message: String },
    #[error("Failed to fetch item {sample_index}: {message}")]
    InspectFailed { sample_index: i64, message: String },
    #[error("{0} is already in progress")]
    Busy(Action),
}
