//! Wire models mirroring the JSON exchanged with the catalog API.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

pub mod auth;
pub mod category;
pub mod config;
pub mod product;
pub mod role;
pub mod user;

/// Pagination block attached to every list response.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMetadata {
    /// Total number of records after filtering.
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
    /// Current page number, 1-indexed.
    pub page: usize,
    pub total_pages: usize,
}

/// Envelope of the paginated list endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub metadata: PaginationMetadata,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub detail: Option<serde_json::Value>,
    /// Field-level validation messages.
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Prefers `message`, falling back to a string `detail`.
    pub fn message(&self) -> Option<String> {
        self.message.clone().or(match &self.detail {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            _ => None,
        })
    }
}

/// Parses the timestamps produced by the API, with or without an offset.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TypeConstraintError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|_| TypeConstraintError::InvalidValue(format!("timestamp `{value}`")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_and_naive_timestamps() {
        let with_offset = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
        let naive = parse_timestamp("2024-05-01T10:00:00.250").unwrap();
        assert_eq!(with_offset.to_string(), "2024-05-01 10:00:00");
        assert_eq!(naive.to_string(), "2024-05-01 10:00:00.250");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"Nope","detail":"Other"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Nope"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Not authenticated"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Not authenticated"));
    }
}
