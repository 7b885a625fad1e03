//! Route handlers.
//!
//! Every gateway handler follows the same contract:
//! decode parameters → resolve host → exactly one backend call → encode.
//! Decode failures are answered before the backend is touched.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::graph::{invoke, BackendCall, ResourceSet};
use crate::http::decode::{query_param, read_resource_set, DecodeError};
use crate::http::host::ResolvedHost;
use crate::http::response::{encode, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{Operation, RouteTable};

/// Run one backend call and encode its outcome.
async fn dispatch(state: &AppState, call: BackendCall, host: &str) -> Response {
    dispatch_since(state, call, host, Instant::now()).await
}

/// `dispatch` for a request whose handling began at `start`.
async fn dispatch_since(
    state: &AppState,
    call: BackendCall,
    host: &str,
    start: Instant,
) -> Response {
    let operation = call.operation();

    tracing::debug!(operation = operation.name(), host = %host, "Dispatching backend call");

    let outcome = invoke(state.graph.as_ref(), &call, host).await;
    metrics::record_backend_call(operation.name(), outcome.is_ok());

    let response = match outcome {
        Ok(result) => encode(result),
        Err(err) => {
            tracing::error!(
                operation = operation.name(),
                host = %host,
                error = %err,
                "Backend query failed"
            );
            ApiError::from(err).into_response()
        }
    };

    metrics::record_request(operation.name(), response.status().as_u16(), start);
    response
}

fn reject(operation: Operation, err: DecodeError, start: Instant) -> Response {
    tracing::warn!(operation = operation.name(), error = %err, "Rejecting request body");
    let response = ApiError::from(err).into_response();
    metrics::record_request(operation.name(), response.status().as_u16(), start);
    response
}

async fn resource_set_call(
    state: AppState,
    host: String,
    request: Request,
    operation: Operation,
    call: fn(ResourceSet) -> BackendCall,
) -> Response {
    let start = Instant::now();
    match read_resource_set(request, state.max_body_size).await {
        Ok(set) => dispatch_since(&state, call(set), &host, start).await,
        Err(err) => reject(operation, err, start),
    }
}

/// POST /ressetdetails
pub async fn resource_set_details(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    request: Request,
) -> Response {
    resource_set_call(
        state,
        host,
        request,
        Operation::ResourceSetDetails,
        BackendCall::ResourceSetDetails,
    )
    .await
}

/// POST /ressetpeople
pub async fn resource_set_people(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    request: Request,
) -> Response {
    resource_set_call(
        state,
        host,
        request,
        Operation::ResourceSetPeople,
        BackendCall::ResourceSetPeople,
    )
    .await
}

/// GET /details?r=
pub async fn details(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    uri: Uri,
) -> Response {
    dispatch(&state, BackendCall::Details(query_param(&uri, "r")), &host).await
}

/// GET /resdetails?r=
pub async fn resource_details(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    uri: Uri,
) -> Response {
    dispatch(&state, BackendCall::ResourceDetails(query_param(&uri, "r")), &host).await
}

/// GET /temporal?b=&e=
pub async fn temporal(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    uri: Uri,
) -> Response {
    let call = BackendCall::Temporal {
        begin: query_param(&uri, "b"),
        end: query_param(&uri, "e"),
    };
    dispatch(&state, call, &host).await
}

/// GET /logo?r=
pub async fn logo(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    uri: Uri,
) -> Response {
    dispatch(&state, BackendCall::Logo(query_param(&uri, "r")), &host).await
}

/// GET /describe?r=
pub async fn describe(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    uri: Uri,
) -> Response {
    dispatch(&state, BackendCall::Describe(query_param(&uri, "r")), &host).await
}

/// GET /orgsearch?r=
pub async fn organizations(
    State(state): State<AppState>,
    ResolvedHost(host): ResolvedHost,
    uri: Uri,
) -> Response {
    dispatch(&state, BackendCall::Organizations(query_param(&uri, "r")), &host).await
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct ApiDocs {
    pub services: Vec<RouteTable>,
}

/// GET /apidocs.json - both route tables as documentation.
pub async fn api_docs(State(state): State<AppState>) -> Json<ApiDocs> {
    Json(ApiDocs {
        services: state.tables.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use ::metrics::{
        Counter, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder, SharedString,
        Unit,
    };
    use axum::http::StatusCode;

    /// Keeps every `gateway_request_duration_seconds` sample.
    #[derive(Default)]
    struct DurationRecorder(Arc<Mutex<Vec<f64>>>);

    struct Samples(Arc<Mutex<Vec<f64>>>);

    impl HistogramFn for Samples {
        fn record(&self, value: f64) {
            self.0.lock().unwrap().push(value);
        }
    }

    impl Recorder for DurationRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
            Counter::noop()
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            if key.name() == "gateway_request_duration_seconds" {
                Histogram::from_arc(Arc::new(Samples(self.0.clone())))
            } else {
                Histogram::noop()
            }
        }
    }

    #[test]
    fn test_rejected_request_duration_counts_from_start() {
        let recorder = DurationRecorder::default();
        let start = Instant::now() - Duration::from_millis(50);

        let response = ::metrics::with_local_recorder(&recorder, || {
            reject(Operation::ResourceSetDetails, DecodeError::MissingBodyParameter, start)
        });

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let samples = recorder.0.lock().unwrap().clone();
        assert_eq!(samples.len(), 1);
        assert!(samples[0] >= 0.05, "recorded {}", samples[0]);
    }
}
