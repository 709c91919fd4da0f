use thiserror::Error;

/// Failure of one call to the analytics service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP error: {status}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Rejected attempt to build or change a [`crate::selection::Selection`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no file has been uploaded")]
    MissingFile,

    #[error("select at least one timestamp")]
    NoMinutes,

    #[error("at most {max} timestamps can be compared, got {got}")]
    TooManyMinutes { max: usize, got: usize },

    #[error("timestamp {0} was selected twice")]
    DuplicateMinute(String),

    #[error("timestamp {0} is not part of the selection")]
    UnknownMinute(String),

    #[error("no hour has been chosen")]
    NoHour,
}
