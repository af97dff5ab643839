// sendgrid-api/src/error.rs
use crate::http::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendGridError {
    /// Transport failure or non-success status from the API
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API accepted the call but refused the record (Contact DB batches)
    #[error("Rejected by SendGrid: {0}")]
    Rejected(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl SendGridError {
    /// HTTP status code, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            SendGridError::Http(e) => e.status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, SendGridError>;
