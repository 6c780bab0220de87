//! Building the client response from a backend outcome.
//!
//! Only a fixed set of things crosses from backend to client: status,
//! `Content-Type`, cookies (name, value, expiry), and the body. Submitted
//! form fields are echoed back as response headers. Failures become a
//! status plus a message body.

use axum::body::Body;
use axum::http::header::{
    CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, SET_COOKIE, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;

use super::dispatch::Classification;
use super::forward::{BackendResponse, ForwardOutcome};

const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Form fields submitted with the request: an urlencoded body, or the
/// query string when the request has no body.
#[must_use]
pub fn form_fields(headers: &HeaderMap, query: Option<&str>, body: &Bytes) -> Vec<(String, String)> {
    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with(FORM_URLENCODED));

    let raw: &[u8] = if is_form {
        &body[..]
    } else if body.is_empty() {
        query.map(str::as_bytes).unwrap_or_default()
    } else {
        &[]
    };

    url::form_urlencoded::parse(raw)
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Headers a form field may never set: message framing, hop-by-hop
/// headers, and the relayed `Content-Type`.
fn is_reserved(name: &HeaderName) -> bool {
    const KEEP_ALIVE: &str = "keep-alive";
    [
        CONTENT_LENGTH,
        TRANSFER_ENCODING,
        CONNECTION,
        UPGRADE,
        TE,
        TRAILER,
        CONTENT_TYPE,
    ]
    .contains(name)
        || name.as_str() == KEEP_ALIVE
}

/// Echo each form field as a `name: value` response header.
pub fn echo_form_fields(headers: &mut HeaderMap, fields: &[(String, String)]) {
    for (name, value) in fields {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(_)) if is_reserved(&name) => {
                tracing::warn!(field = %name, "form field names a reserved header, skipping");
            }
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => {
                tracing::warn!(field = %name, "form field is not a valid header, skipping");
            }
        }
    }
}

/// A backend cookie reduced to what the broker relays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedCookie {
    pub name: String,
    pub value: String,
    pub expires: Option<String>,
    pub max_age: Option<String>,
}

impl RelayedCookie {
    /// Parse a `Set-Cookie` header value. Returns `None` when there is no
    /// `name=value` pair.
    #[must_use]
    pub fn parse(set_cookie: &str) -> Option<Self> {
        let mut parts = set_cookie.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self {
            name: name.to_string(),
            value: value.trim().to_string(),
            expires: None,
            max_age: None,
        };

        for attr in parts {
            let Some((key, val)) = attr.split_once('=') else {
                continue;
            };
            let val = val.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "expires" => cookie.expires = Some(val),
                "max-age" => cookie.max_age = Some(val),
                _ => {}
            }
        }

        Some(cookie)
    }

    #[must_use]
    pub fn to_header_string(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(ref expires) = self.expires {
            out.push_str("; Expires=");
            out.push_str(expires);
        }
        if let Some(ref max_age) = self.max_age {
            out.push_str("; Max-Age=");
            out.push_str(max_age);
        }
        out
    }
}

/// Copy every backend cookie onto the client response.
pub fn relay_cookies(from: &HeaderMap, to: &mut HeaderMap) {
    for raw in from.get_all(SET_COOKIE) {
        let Some(cookie) = raw.to_str().ok().and_then(RelayedCookie::parse) else {
            tracing::warn!("unparseable Set-Cookie from backend, skipping");
            continue;
        };
        match HeaderValue::from_str(&cookie.to_header_string()) {
            Ok(value) => {
                to.append(SET_COOKIE, value);
            }
            Err(_) => tracing::warn!(cookie = %cookie.name, "cookie not representable, skipping"),
        }
    }
}

fn response(status: StatusCode, content_type: Option<HeaderValue>, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let content_type =
        content_type.unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    response.headers_mut().insert(CONTENT_TYPE, content_type);
    response
}

/// A plain message body terminated by a newline.
#[must_use]
pub fn message_response(status: StatusCode, message: &str) -> Response {
    response(status, None, Body::from(format!("{message}\n")))
}

fn relay_success(
    backend: BackendResponse,
    classification: Classification,
    form: &[(String, String)],
) -> Response {
    let content_type = backend.content_type().cloned();
    let body = match classification {
        Classification::Media => Body::from(backend.body),
        Classification::Html => {
            let mut text = String::from_utf8_lossy(&backend.body).into_owned();
            text.push('\n');
            Body::from(text)
        }
    };

    let mut resp = response(backend.status, content_type, body);
    echo_form_fields(resp.headers_mut(), form);
    relay_cookies(&backend.headers, resp.headers_mut());
    resp
}

fn relay_http_error(backend: BackendResponse) -> Response {
    if backend.body.is_empty() {
        let reason = backend.status.canonical_reason().unwrap_or("Unknown");
        let message = format!(
            "The remote server returned an error: ({}) {reason}.",
            backend.status.as_u16()
        );
        return message_response(backend.status, &message);
    }
    let content_type = backend.content_type().cloned();
    response(backend.status, content_type, Body::from(backend.body))
}

/// Turn a forward outcome into the client response.
#[must_use]
pub fn relay(
    outcome: ForwardOutcome,
    classification: Classification,
    form: &[(String, String)],
) -> Response {
    match outcome {
        ForwardOutcome::Relayed(backend) => relay_success(backend, classification, form),
        ForwardOutcome::HttpError(backend) => relay_http_error(backend),
        ForwardOutcome::Unreachable { url, message } => message_response(
            StatusCode::BAD_GATEWAY,
            &format!("Unable to reach {url}: {message}"),
        ),
        ForwardOutcome::TimedOut { url, after } => message_response(
            StatusCode::GATEWAY_TIMEOUT,
            &format!("{url} did not respond within {}ms", after.as_millis()),
        ),
    }
}
