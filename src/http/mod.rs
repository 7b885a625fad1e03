//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → [route table dispatches to a handler]
//!     → host.rs + decode.rs (resolve host, decode parameters)
//!     → handlers.rs (one backend call)
//!     → response.rs (encode result or error)
//!     → Send to client
//! ```

pub mod decode;
pub mod handlers;
pub mod host;
pub mod request;
pub mod response;
pub mod server;

pub use decode::{decode_resource_set, query_param, DecodeError};
pub use host::{resolve_host, ResolvedHost};
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{encode, ApiError, ErrorResponse};
pub use server::{build_router, AppState, HttpServer};
