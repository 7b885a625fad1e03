//! Graph backend subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → client.rs (BackendCall → one GraphClient method)
//!     → sparql.rs (render template, POST to endpoint)
//!     → QueryResult::Structured | QueryResult::Raw
//! ```

pub mod client;
pub mod sparql;
pub mod templates;

pub use client::{
    invoke, BackendCall, GraphClient, GraphError, GraphResult, QueryResult, ResourceSet,
};
pub use sparql::SparqlClient;
pub use templates::QueryTemplates;
