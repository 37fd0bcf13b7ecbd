use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Shown when the API could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
/// Shown when the session was rejected by the API.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Please login again.";
/// Shown when the API failed without a message of its own.
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The caller abandoned the request; never surfaced to the user.
    #[error("Request cancelled")]
    Cancelled,

    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        /// Field-level details returned by the API, if any.
        errors: Option<serde_json::Value>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RepositoryError::Cancelled)
    }

    /// HTTP status associated with the failure, `0` when no response arrived.
    pub fn status(&self) -> u16 {
        match self {
            RepositoryError::Api { status, .. } => *status,
            RepositoryError::Unauthorized(_) => 401,
            RepositoryError::NotFound => 404,
            _ => 0,
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if err.is_builder() {
            RepositoryError::ValidationError(err.to_string())
        } else {
            log::warn!("Transport failure: {err}");
            RepositoryError::Network(NETWORK_ERROR_MESSAGE.to_string())
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::Decode(val.to_string())
    }
}
