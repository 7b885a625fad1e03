//! Query parameter and request body decoding.
//!
//! Query parameters are free-form strings the backend tolerates; the
//! resource-set body is the only client input that can be structurally
//! invalid.

use std::borrow::Cow;

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use thiserror::Error;
use url::form_urlencoded;

use crate::graph::ResourceSet;
use crate::routing::table::MIME_FORM;

/// Form field carrying the JSON array on the POST routes.
pub const BODY_PARAMETER: &str = "body";

/// Why a resource-set body was rejected.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body could not be read off the connection.
    #[error("request body could not be read: {0}")]
    BodyRead(String),

    /// The body parameter is absent or empty.
    #[error("request has no 'body' parameter")]
    MissingBodyParameter,

    /// The body parameter is not a JSON array of strings.
    #[error("body parameter is not a JSON array of strings: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

impl DecodeError {
    pub fn status(&self) -> StatusCode {
        match self {
            DecodeError::BodyRead(_) | DecodeError::MissingBodyParameter => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DecodeError::MalformedPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// First value of query parameter `name`, percent-decoded. Absent → "".
pub fn query_param(uri: &Uri, name: &str) -> String {
    uri.query()
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

fn is_form(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(MIME_FORM))
        .unwrap_or(false)
}

/// Decode a resource set from an already-read body.
///
/// Form-encoded bodies carry the JSON array in the `body` field; any other
/// content type is taken to be the JSON array itself.
pub fn decode_resource_set(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<ResourceSet, DecodeError> {
    let payload: Cow<'_, [u8]> = if is_form(content_type) {
        let value = form_urlencoded::parse(body)
            .find(|(key, _)| key == BODY_PARAMETER)
            .map(|(_, value)| value.into_owned())
            .ok_or(DecodeError::MissingBodyParameter)?;
        Cow::Owned(value.into_bytes())
    } else {
        Cow::Borrowed(body)
    };

    if payload.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::MissingBodyParameter);
    }

    let resources: Vec<String> = serde_json::from_slice(&payload)?;
    Ok(ResourceSet(resources))
}

/// Read at most `limit` bytes of `request`'s body and decode a resource set.
pub async fn read_resource_set(request: Request, limit: usize) -> Result<ResourceSet, DecodeError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let body = axum::body::to_bytes(request.into_body(), limit)
        .await
        .map_err(|e| DecodeError::BodyRead(e.to_string()))?;

    decode_resource_set(content_type.as_deref(), &body)
}
