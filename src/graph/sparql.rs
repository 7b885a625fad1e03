//! SPARQL 1.1 Protocol client.
//!
//! # Responsibilities
//! - Render the operation's query template
//! - POST it to the configured endpoint (form-encoded `query` field)
//! - Flatten SPARQL JSON results for structured operations
//! - Hand back the endpoint's body untouched for raw operations
//!
//! # Design Decisions
//! - One HTTP exchange per call, no retries
//! - Timeouts come from the reqwest client, reported as `GraphError::Timeout`

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::SparqlConfig;
use crate::graph::client::{GraphClient, GraphError, GraphResult, ResourceSet};
use crate::graph::templates::{render, QueryArgs, QueryTemplates};
use crate::routing::Operation;

/// Media type of SPARQL JSON results.
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Longest endpoint error body kept in a `GraphError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Graph client backed by a SPARQL endpoint.
#[derive(Clone)]
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
    queries: QueryTemplates,
}

impl SparqlClient {
    pub fn new(config: &SparqlConfig) -> GraphResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
            queries: config.queries.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the operation's query and return the raw response body.
    async fn execute(&self, operation: Operation, args: &QueryArgs<'_>) -> GraphResult<Bytes> {
        let query = render(self.queries.get(operation), args);

        tracing::debug!(
            operation = operation.name(),
            endpoint = %self.endpoint,
            query_len = query.len(),
            "Sending SPARQL query"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query.as_str())])
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_reqwest(e))?;

        if !status.is_success() {
            let mut text = String::from_utf8_lossy(&body).into_owned();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(GraphError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(body)
    }

    async fn select(&self, operation: Operation, args: &QueryArgs<'_>) -> GraphResult<Value> {
        let body = self.execute(operation, args).await?;
        flatten_results(&body)
    }

    fn map_reqwest(&self, err: reqwest::Error) -> GraphError {
        if err.is_timeout() {
            GraphError::Timeout(self.timeout_secs)
        } else {
            GraphError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl GraphClient for SparqlClient {
    async fn details(&self, resource: &str, host: &str) -> GraphResult<Value> {
        let args = QueryArgs { resource, host, ..Default::default() };
        self.select(Operation::Details, &args).await
    }

    async fn resource(&self, resource: &str, host: &str) -> GraphResult<Value> {
        let args = QueryArgs { resource, host, ..Default::default() };
        self.select(Operation::ResourceDetails, &args).await
    }

    async fn logo(&self, resource: &str, host: &str) -> GraphResult<Value> {
        let args = QueryArgs { resource, host, ..Default::default() };
        self.select(Operation::Logo, &args).await
    }

    async fn describe(&self, resource: &str, host: &str) -> GraphResult<Value> {
        let args = QueryArgs { resource, host, ..Default::default() };
        self.select(Operation::Describe, &args).await
    }

    async fn organizations(&self, text: &str, host: &str) -> GraphResult<Bytes> {
        let args = QueryArgs { resource: text, host, ..Default::default() };
        self.execute(Operation::Organizations, &args).await
    }

    async fn temporal(&self, begin: &str, end: &str, host: &str) -> GraphResult<Value> {
        let args = QueryArgs { begin, end, host, ..Default::default() };
        self.select(Operation::Temporal, &args).await
    }

    async fn resource_set(&self, resources: &ResourceSet, host: &str) -> GraphResult<Value> {
        let args = QueryArgs { resources: resources.as_slice(), host, ..Default::default() };
        self.select(Operation::ResourceSetDetails, &args).await
    }

    async fn resource_set_people(
        &self,
        resources: &ResourceSet,
        host: &str,
    ) -> GraphResult<Value> {
        let args = QueryArgs { resources: resources.as_slice(), host, ..Default::default() };
        self.select(Operation::ResourceSetPeople, &args).await
    }
}

#[derive(Deserialize)]
struct SparqlResults {
    results: SparqlBindings,
}

#[derive(Deserialize)]
struct SparqlBindings {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Deserialize)]
struct SparqlTerm {
    value: String,
}

/// Turn a SPARQL JSON results document into `[{var: value, ...}, ...]`.
///
/// Unbound variables are absent from their row.
pub fn flatten_results(body: &[u8]) -> GraphResult<Value> {
    let parsed: SparqlResults =
        serde_json::from_slice(body).map_err(|e| GraphError::Decode(e.to_string()))?;

    let rows = parsed
        .results
        .bindings
        .into_iter()
        .map(|row| {
            let object: Map<String, Value> = row
                .into_iter()
                .map(|(var, term)| (var, Value::String(term.value)))
                .collect();
            Value::Object(object)
        })
        .collect();

    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_results() {
        let body = br#"{
            "head": { "vars": ["s", "name"] },
            "results": { "bindings": [
                { "s": { "type": "uri", "value": "urn:a" },
                  "name": { "type": "literal", "value": "A", "xml:lang": "en" } },
                { "s": { "type": "uri", "value": "urn:b" } }
            ] }
        }"#;

        let value = flatten_results(body).unwrap();
        assert_eq!(
            value,
            json!([
                { "s": "urn:a", "name": "A" },
                { "s": "urn:b" }
            ])
        );
    }

    #[test]
    fn test_flatten_empty_results() {
        let body = br#"{"head":{"vars":[]},"results":{"bindings":[]}}"#;
        assert_eq!(flatten_results(body).unwrap(), json!([]));
    }

    #[test]
    fn test_flatten_rejects_non_results_document() {
        let err = flatten_results(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, GraphError::Decode(_)));

        let err = flatten_results(br#"{"boolean": true}"#).unwrap_err();
        assert!(matches!(err, GraphError::Decode(_)));
    }

    #[test]
    fn test_client_from_default_config() {
        let client = SparqlClient::new(&SparqlConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/blazegraph/namespace/kb/sparql"
        );
    }
}
