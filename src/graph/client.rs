//! Graph query client contract and backend invocation.
//!
//! # Responsibilities
//! - Define the `GraphClient` capability (one method per operation)
//! - Map each route's decoded arguments to exactly one backend call
//! - Wrap the typed return in the operation's declared result shape

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::routing::Operation;

/// Errors that can occur while querying the graph backend.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The endpoint could not be reached or the exchange broke off.
    #[error("SPARQL endpoint unreachable: {0}")]
    Transport(String),

    /// The endpoint did not answer in time.
    #[error("SPARQL query timed out after {0} seconds")]
    Timeout(u64),

    /// The endpoint answered with a non-success status.
    #[error("SPARQL endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint's answer was not a SPARQL JSON results document.
    #[error("SPARQL results could not be decoded: {0}")]
    Decode(String),
}

/// Result type for graph backend operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Ordered list of resource URIs from a batch request. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSet(pub Vec<String>);

impl ResourceSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for ResourceSet {
    fn from(resources: Vec<String>) -> Self {
        Self(resources)
    }
}

/// Output of one backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// A value to be JSON-encoded by the gateway.
    Structured(Value),
    /// Already-serialized JSON, written unchanged.
    Raw(Bytes),
}

/// The graph backend as seen by the gateway.
///
/// `host` is the logical host of the incoming request, used by the backend
/// to build absolute links in its results.
#[async_trait]
pub trait GraphClient: Send + Sync {
    async fn details(&self, resource: &str, host: &str) -> GraphResult<Value>;

    /// Measurement and parameter details of a resource.
    async fn resource(&self, resource: &str, host: &str) -> GraphResult<Value>;

    async fn logo(&self, resource: &str, host: &str) -> GraphResult<Value>;

    async fn describe(&self, resource: &str, host: &str) -> GraphResult<Value>;

    /// Organization search. Returns the backend's JSON bytes untouched.
    async fn organizations(&self, text: &str, host: &str) -> GraphResult<Bytes>;

    async fn temporal(&self, begin: &str, end: &str, host: &str) -> GraphResult<Value>;

    async fn resource_set(&self, resources: &ResourceSet, host: &str) -> GraphResult<Value>;

    async fn resource_set_people(&self, resources: &ResourceSet, host: &str)
        -> GraphResult<Value>;
}

/// Decoded arguments for a single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    ResourceSetDetails(ResourceSet),
    ResourceSetPeople(ResourceSet),
    Details(String),
    ResourceDetails(String),
    Temporal { begin: String, end: String },
    Logo(String),
    Describe(String),
    Organizations(String),
}

impl BackendCall {
    pub fn operation(&self) -> Operation {
        match self {
            BackendCall::ResourceSetDetails(_) => Operation::ResourceSetDetails,
            BackendCall::ResourceSetPeople(_) => Operation::ResourceSetPeople,
            BackendCall::Details(_) => Operation::Details,
            BackendCall::ResourceDetails(_) => Operation::ResourceDetails,
            BackendCall::Temporal { .. } => Operation::Temporal,
            BackendCall::Logo(_) => Operation::Logo,
            BackendCall::Describe(_) => Operation::Describe,
            BackendCall::Organizations(_) => Operation::Organizations,
        }
    }
}

/// Make exactly one backend call for `call`. No retries.
pub async fn invoke(
    client: &dyn GraphClient,
    call: &BackendCall,
    host: &str,
) -> GraphResult<QueryResult> {
    let result = match call {
        BackendCall::ResourceSetDetails(set) => {
            QueryResult::Structured(client.resource_set(set, host).await?)
        }
        BackendCall::ResourceSetPeople(set) => {
            QueryResult::Structured(client.resource_set_people(set, host).await?)
        }
        BackendCall::Details(r) => QueryResult::Structured(client.details(r, host).await?),
        BackendCall::ResourceDetails(r) => QueryResult::Structured(client.resource(r, host).await?),
        BackendCall::Temporal { begin, end } => {
            QueryResult::Structured(client.temporal(begin, end, host).await?)
        }
        BackendCall::Logo(r) => QueryResult::Structured(client.logo(r, host).await?),
        BackendCall::Describe(r) => QueryResult::Structured(client.describe(r, host).await?),
        BackendCall::Organizations(r) => QueryResult::Raw(client.organizations(r, host).await?),
    };
    Ok(result)
}
