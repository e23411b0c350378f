// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Errors crossing the REST boundary.
//!
//! The same enum is produced by the server handlers and reconstructed by
//! the client from status codes, so both sides agree on what went wrong.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a project API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected input (HTTP 400).
    #[error("{0}")]
    BadRequest(String),

    /// Unknown project (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not what the API promises.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn project_not_found() -> Self {
        ApiError::NotFound("Project not found".to_string())
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Status { status, .. } => *status,
            ApiError::Transport(_) | ApiError::Decode(_) => 500,
        }
    }

    /// Rebuild an error from a status code and its `{message}` body.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => ApiError::BadRequest(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Status { status, message },
        }
    }

    /// Text placed in the `{message}` body.
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => message.clone(),
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// JSON body of every error response: `{"message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_keeps_message() {
        for err in [
            ApiError::BadRequest("Title is required".into()),
            ApiError::project_not_found(),
            ApiError::Status { status: 503, message: "busy".into() },
        ] {
            let rebuilt = ApiError::from_status(err.status_code(), err.message());
            assert_eq!(rebuilt, err);
        }
    }
}
