// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types and their HTTP responses.
//!
//! Every error body is a single JSON string. Internal details are logged,
//! never returned to the client.

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Response header carrying a stable error code.
pub const ERROR_CODE_HEADER: HeaderName = HeaderName::from_static("x-error-code");

/// Board error types.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Unable to parse JSON: {0}")]
    MalformedPoast(String),

    #[error("Unable to serialize poasts: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("Unable to encode metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl BoardError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedPoast(_) => "MALFORMED_POAST",
            Self::Serialization(_) => "SERIALIZATION_FAILED",
            Self::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            Self::Metrics(_) => "METRICS_UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedPoast(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Serialization(_) | Self::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = match &self {
            Self::MalformedPoast(_) | Self::MethodNotAllowed(_) => self.to_string(),
            Self::Serialization(err) => {
                error!(error = %err, code, "Serialization failed");
                "Unable to serialize poasts".to_string()
            }
            Self::Metrics(err) => {
                error!(error = %err, code, "Metrics encoding failed");
                "Unable to encode metrics".to_string()
            }
        };

        let mut response =
            (self.status(), [(ERROR_CODE_HEADER, code)], Json(message)).into_response();
        if let Self::MethodNotAllowed(_) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, header::HeaderValue::from_static("GET, POST"));
        }
        response
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BoardError>;
