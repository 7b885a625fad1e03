//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with both graph surfaces and the service routes
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::graph::{GraphClient, GraphResult, SparqlClient};
use crate::http::handlers;
use crate::http::request::MakeRequestUuidV4;
use crate::routing::{self, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn GraphClient>,
    pub tables: Arc<[RouteTable]>,
    pub max_body_size: usize,
}

impl AppState {
    pub fn new(graph: Arc<dyn GraphClient>, tables: Vec<RouteTable>, max_body_size: usize) -> Self {
        Self {
            graph,
            tables: tables.into(),
            max_body_size,
        }
    }
}

/// HTTP server for the graph gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by `graph`.
    pub fn new(config: GatewayConfig, graph: Arc<dyn GraphClient>) -> Self {
        let state = AppState::new(graph, routing::tables(), config.security.max_body_size);
        let router = build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Self { router, config }
    }

    /// Create a server talking to the configured SPARQL endpoint.
    pub fn from_config(config: GatewayConfig) -> GraphResult<Self> {
        let client = SparqlClient::new(&config.sparql)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            sparql_endpoint = %self.config.sparql.endpoint,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// A request outliving `request_timeout` is answered with 504.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let surfaces = routing::mount(&state.tables);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/apidocs.json", get(handlers::api_docs))
        .merge(surfaces)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
}
