//! Logical host resolution.
//!
//! The resolved host is handed to every backend call so results can carry
//! absolute links pointing back at the host the client used.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// First non-empty `Host` header, else the connection-level host, else "".
pub fn resolve_host(headers: &HeaderMap, connection_host: Option<&str>) -> String {
    let from_header = headers
        .get_all(HOST)
        .iter()
        .next()
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    from_header
        .or(connection_host)
        .unwrap_or_default()
        .to_string()
}

/// Extractor yielding the request's resolved host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHost(pub String);

impl<S> FromRequestParts<S> for ResolvedHost
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authority = parts.uri.authority().map(|a| a.as_str());
        Ok(Self(resolve_host(&parts.headers, authority)))
    }
}
