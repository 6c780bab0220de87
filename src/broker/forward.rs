//! Outbound call to the selected backend.
//!
//! [`forward`] replays the client's method, body, and cookies against
//! `http://{address}:{port}{path}` under a timeout and classifies the
//! result as a [`ForwardOutcome`]. Nothing here returns `Err`: backend
//! failures are data the relay step turns into a client response.

use std::time::{Duration, Instant};

use axum::http::{HeaderMap, HeaderValue, Method};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{CONTENT_TYPE, COOKIE};
use hyper::StatusCode;

use crate::directory::BackendDescriptor;
use crate::server::HttpClient;

#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl BackendResponse {
    #[must_use]
    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.headers.get(CONTENT_TYPE)
    }
}

#[derive(Debug)]
pub enum ForwardOutcome {
    /// The backend answered with a non-error status.
    Relayed(BackendResponse),
    /// The backend answered 4xx or 5xx.
    HttpError(BackendResponse),
    /// No HTTP response: refused connection, reset, bad URL, body error.
    Unreachable { url: String, message: String },
    TimedOut { url: String, after: Duration },
}

pub struct ForwardRequest<'a> {
    pub client: &'a HttpClient,
    pub backend: &'a BackendDescriptor,
    pub method: &'a Method,
    /// Path plus optional `?query`, exactly as the client sent it.
    pub path_and_query: &'a str,
    pub headers: &'a HeaderMap,
    pub body: &'a Bytes,
    pub timeout: Duration,
    pub correlation_id: &'a str,
}

#[must_use]
pub fn backend_url(backend: &BackendDescriptor, path_and_query: &str) -> String {
    format!(
        "http://{}:{}{}",
        backend.address, backend.port, path_and_query
    )
}

#[allow(clippy::cast_possible_truncation)]
pub async fn forward(req: ForwardRequest<'_>) -> ForwardOutcome {
    let url = backend_url(req.backend, req.path_and_query);
    let start = Instant::now();

    let mut builder = hyper::Request::builder()
        .method(req.method.clone())
        .uri(url.as_str());
    for name in [CONTENT_TYPE, COOKIE] {
        if let Some(value) = req.headers.get(&name) {
            builder = builder.header(name, value);
        }
    }

    let outbound = match builder.body(Full::new(req.body.clone())) {
        Ok(r) => r,
        Err(e) => {
            return ForwardOutcome::Unreachable {
                url,
                message: e.to_string(),
            };
        }
    };

    let call = async {
        let response = req.client.request(outbound).await.map_err(|e| e.to_string())?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| format!("body read error: {e}"))?
            .to_bytes();
        Ok::<_, String>(BackendResponse {
            status,
            headers,
            body,
        })
    };

    let result = tokio::time::timeout(req.timeout, call).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(response)) => {
            tracing::info!(
                correlation_id = %req.correlation_id,
                backend = %req.backend,
                status = response.status.as_u16(),
                latency_ms,
                "backend responded"
            );
            if response.status.is_client_error() || response.status.is_server_error() {
                ForwardOutcome::HttpError(response)
            } else {
                ForwardOutcome::Relayed(response)
            }
        }
        Ok(Err(message)) => {
            tracing::warn!(
                correlation_id = %req.correlation_id,
                backend = %req.backend,
                error = %message,
                latency_ms,
                "backend unreachable"
            );
            ForwardOutcome::Unreachable { url, message }
        }
        Err(_) => {
            tracing::warn!(
                correlation_id = %req.correlation_id,
                backend = %req.backend,
                latency_ms,
                "backend timed out"
            );
            ForwardOutcome::TimedOut {
                url,
                after: req.timeout,
            }
        }
    }
}
