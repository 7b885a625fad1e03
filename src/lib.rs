//! Graph Gateway Library
//!
//! REST gateway over a SPARQL triplestore. Two surfaces are mounted:
//! production (`/api/v1/graph`) and development (`/api/dev/graph`).

pub mod config;
pub mod graph;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use graph::{GraphClient, SparqlClient};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
