//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Router};
use bytes::Bytes;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use graph_gateway::config::GatewayConfig;
use graph_gateway::graph::{GraphClient, GraphError, GraphResult, ResourceSet};
use graph_gateway::http::{build_router, AppState, HttpServer};
use graph_gateway::{routing, Shutdown};

/// How the stub backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    Ok,
    Fail,
    Timeout,
    /// Never answers within any test's patience.
    Stall,
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub args: Vec<String>,
    pub host: String,
}

/// Deterministic in-memory graph backend.
pub struct StubGraph {
    pub structured: Value,
    pub raw: Bytes,
    pub mode: StubMode,
    calls: Mutex<Vec<Call>>,
}

impl StubGraph {
    pub fn new(structured: Value, raw: &'static [u8]) -> Self {
        Self {
            structured,
            raw: Bytes::from_static(raw),
            mode: StubMode::Ok,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_mode(mut self, mode: StubMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn record<T>(
        &self,
        method: &'static str,
        args: Vec<String>,
        host: &str,
        ok: T,
    ) -> GraphResult<T> {
        if self.mode == StubMode::Stall {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        self.calls.lock().unwrap().push(Call {
            method,
            args,
            host: host.to_string(),
        });
        match self.mode {
            StubMode::Ok | StubMode::Stall => Ok(ok),
            StubMode::Fail => Err(GraphError::Transport("store down".into())),
            StubMode::Timeout => Err(GraphError::Timeout(3)),
        }
    }
}

#[async_trait]
impl GraphClient for StubGraph {
    async fn details(&self, resource: &str, host: &str) -> GraphResult<Value> {
        self.record("details", vec![resource.into()], host, self.structured.clone()).await
    }

    async fn resource(&self, resource: &str, host: &str) -> GraphResult<Value> {
        self.record("resource", vec![resource.into()], host, self.structured.clone()).await
    }

    async fn logo(&self, resource: &str, host: &str) -> GraphResult<Value> {
        self.record("logo", vec![resource.into()], host, self.structured.clone()).await
    }

    async fn describe(&self, resource: &str, host: &str) -> GraphResult<Value> {
        self.record("describe", vec![resource.into()], host, self.structured.clone()).await
    }

    async fn organizations(&self, text: &str, host: &str) -> GraphResult<Bytes> {
        self.record("organizations", vec![text.into()], host, self.raw.clone()).await
    }

    async fn temporal(&self, begin: &str, end: &str, host: &str) -> GraphResult<Value> {
        self.record("temporal", vec![begin.into(), end.into()], host, self.structured.clone()).await
    }

    async fn resource_set(&self, resources: &ResourceSet, host: &str) -> GraphResult<Value> {
        self.record("resource_set", resources.0.clone(), host, self.structured.clone()).await
    }

    async fn resource_set_people(
        &self,
        resources: &ResourceSet,
        host: &str,
    ) -> GraphResult<Value> {
        self.record("resource_set_people", resources.0.clone(), host, self.structured.clone()).await
    }
}

/// Fully layered gateway router over `graph`.
pub fn stub_app(graph: Arc<StubGraph>) -> Router {
    stub_app_with_timeout(graph, Duration::from_secs(5))
}

/// Like `stub_app`, with a custom server-wide request timeout.
pub fn stub_app_with_timeout(graph: Arc<StubGraph>, request_timeout: Duration) -> Router {
    let state = AppState::new(graph, routing::tables(), 64 * 1024);
    build_router(state, request_timeout)
}

/// A mock SPARQL endpoint recording the `query` field of every POST.
pub struct MockEndpoint {
    pub addr: SocketAddr,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockEndpoint {
    pub fn url(&self) -> String {
        format!("http://{}/sparql", self.addr)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

/// Start a mock SPARQL endpoint answering every query with `status` and `body`.
pub async fn start_sparql_endpoint(status: u16, body: &'static str) -> MockEndpoint {
    start_delayed_endpoint(status, body, Duration::ZERO).await
}

/// Like `start_sparql_endpoint`, but waits `delay` before answering.
pub async fn start_delayed_endpoint(status: u16, body: &'static str, delay: Duration) -> MockEndpoint {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let recorded = queries.clone();

    let app = Router::new().route(
        "/sparql",
        post(move |Form(form): Form<HashMap<String, String>>| {
            let recorded = recorded.clone();
            async move {
                recorded
                    .lock()
                    .unwrap()
                    .push(form.get("query").cloned().unwrap_or_default());
                tokio::time::sleep(delay).await;
                (
                    StatusCode::from_u16(status).unwrap(),
                    [(CONTENT_TYPE, "application/sparql-results+json")],
                    body,
                )
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockEndpoint { addr, queries }
}

/// A running gateway bound to an ephemeral port.
pub struct RunningGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the real gateway against `endpoint`.
pub async fn start_gateway(endpoint: &str, sparql_timeout_secs: u64) -> RunningGateway {
    let mut config = GatewayConfig::default();
    config.sparql.endpoint = endpoint.to_string();
    config.sparql.timeout_secs = sparql_timeout_secs;
    start_gateway_with(config).await
}

/// Start the real gateway with `config`, skipping validation.
pub async fn start_gateway_with(config: GatewayConfig) -> RunningGateway {
    let server = HttpServer::from_config(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    RunningGateway {
        addr,
        shutdown,
        handle,
    }
}

/// Client that never reuses connections or goes through a system proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
