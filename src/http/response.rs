//! Response encoding.
//!
//! # Responsibilities
//! - Serialize structured backend results as JSON
//! - Pass pre-serialized backend bytes through unchanged
//! - Map decode and backend errors to HTTP status codes
//!
//! # Design Decisions
//! - Decode failures are status-only (no body), matching existing clients
//! - Backend failures get a JSON error body
//! - Backend timeouts result in 504 Gateway Timeout

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::graph::{GraphError, QueryResult};
use crate::http::decode::DecodeError;
use crate::routing::table::MIME_JSON;

/// Write a backend result as a 200 response.
pub fn encode(result: QueryResult) -> Response {
    match result {
        QueryResult::Structured(value) => Json(value).into_response(),
        QueryResult::Raw(bytes) => (
            [(CONTENT_TYPE, HeaderValue::from_static(MIME_JSON))],
            bytes,
        )
            .into_response(),
    }
}

/// JSON body attached to backend failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Every way a gateway request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Backend(#[from] GraphError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Decode(err) => err.status(),
            ApiError::Backend(GraphError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Decode(_) => status.into_response(),
            ApiError::Backend(err) => {
                let code = match err {
                    GraphError::Timeout(_) => "BACKEND_TIMEOUT",
                    _ => "BACKEND_ERROR",
                };
                let body = Json(ErrorResponse {
                    error: err.to_string(),
                    code,
                });
                (status, body).into_response()
            }
        }
    }
}
