//! Route table registration.
//!
//! # Responsibilities
//! - Nest each table's routes under its surface prefix
//! - Bind each declared method + path to its operation's handler
//!
//! # Design Decisions
//! - Built once from immutable tables; the Axum router is never mutated after
//! - Undeclared methods on a declared path answer 405

use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;

use crate::http::handlers;
use crate::http::server::AppState;
use crate::routing::table::{Operation, RouteMethod, RouteSpec, RouteTable};

/// Register every table under its prefix.
pub fn mount(tables: &[RouteTable]) -> Router<AppState> {
    tables.iter().fold(Router::new(), |router, table| {
        router.nest(table.path, surface(table))
    })
}

fn surface(table: &RouteTable) -> Router<AppState> {
    table.routes.iter().fold(Router::new(), |router, route| {
        tracing::debug!(
            method = ?route.method,
            path = %table.full_path(route),
            operation = route.operation.name(),
            "Registering route"
        );
        router.route(route.path, method_router(route))
    })
}

fn method_router(route: &RouteSpec) -> MethodRouter<AppState> {
    let filter = match route.method {
        RouteMethod::Get => MethodFilter::GET,
        RouteMethod::Post => MethodFilter::POST,
    };

    match route.operation {
        Operation::ResourceSetDetails => on(filter, handlers::resource_set_details),
        Operation::ResourceSetPeople => on(filter, handlers::resource_set_people),
        Operation::Details => on(filter, handlers::details),
        Operation::ResourceDetails => on(filter, handlers::resource_details),
        Operation::Temporal => on(filter, handlers::temporal),
        Operation::Logo => on(filter, handlers::logo),
        Operation::Describe => on(filter, handlers::describe),
        Operation::Organizations => on(filter, handlers::organizations),
    }
}
