//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and backend client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is set on every request and echoed back
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
