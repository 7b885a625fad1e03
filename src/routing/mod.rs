//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     table.rs (production + development RouteTable values)
//!     → router.rs (nest under prefix, bind handlers)
//!     → Axum Router handed to the HTTP server
//!
//! Incoming Request (method, path)
//!     → Axum matches (method, path)
//!     → handler for the route's Operation
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - One operation per route, one route per operation
//! - Tables double as the served API documentation

pub mod router;
pub mod table;

pub use router::mount;
pub use table::{
    Operation, ParamKind, ParamSpec, ResultShape, RouteMethod, RouteSpec, RouteTable, Surface,
};

/// Both surfaces, production first.
pub fn tables() -> Vec<RouteTable> {
    vec![RouteTable::production(), RouteTable::development()]
}
