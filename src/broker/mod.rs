//! The request broker.
//!
//! [`broker_handler`] is the Axum fallback that receives every
//! non-`/health` request. It asks the dispatcher for a backend
//! ([`dispatch`]), performs the outbound call ([`forward`]), and builds
//! the client response from the outcome ([`relay`]).

pub mod dispatch;
pub mod forward;
pub mod relay;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::server::AppState;
use dispatch::{Dispatch, NO_BACKEND_BODY, SERVER_NOT_FOUND_BODY};

pub async fn broker_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();
    let correlation_id = uuid::Uuid::new_v4().to_string();

    let (backend, classification) = match dispatch::dispatch(&state.directory, path) {
        Dispatch::NotHandled => {
            tracing::debug!(method = %method, path = %path, "no extension, not brokered");
            return StatusCode::NOT_FOUND.into_response();
        }
        Dispatch::NoBackend => {
            tracing::warn!(
                correlation_id = %correlation_id,
                path = %path,
                "no backend registered"
            );
            state.stats.unrouted.fetch_add(1, Ordering::Relaxed);
            // Status stays 200; the body carries the error.
            return relay::message_response(StatusCode::OK, NO_BACKEND_BODY);
        }
        Dispatch::MountMismatch { backend, requested } => {
            tracing::warn!(
                correlation_id = %correlation_id,
                path = %path,
                requested = %requested,
                backend = %backend,
                "selected backend does not serve this mount"
            );
            state.stats.unrouted.fetch_add(1, Ordering::Relaxed);
            return relay::message_response(StatusCode::OK, SERVER_NOT_FOUND_BODY);
        }
        Dispatch::Forward {
            backend,
            classification,
        } => (backend, classification),
    };

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        backend = %backend,
        "request received"
    );

    let form = relay::form_fields(&req_headers, uri.query(), &body);
    let path_and_query = uri.path_and_query().map_or(path, |pq| pq.as_str());

    let outcome = forward::forward(forward::ForwardRequest {
        client: &state.http_client,
        backend: &backend,
        method: &method,
        path_and_query,
        headers: &req_headers,
        body: &body,
        timeout: state.forward_timeout,
        correlation_id: &correlation_id,
    })
    .await;

    let counter = match outcome {
        forward::ForwardOutcome::Relayed(_) => &state.stats.forwarded,
        _ => &state.stats.failed,
    };
    counter.fetch_add(1, Ordering::Relaxed);

    relay::relay(outcome, classification, &form)
}
