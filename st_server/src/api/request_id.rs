//! Correlation IDs and per-route accounting for API calls.
//!
//! A caller-supplied `x-request-id` is kept; otherwise a UUID v4 is minted.
//! The ID travels to handlers through [`RequestId`] and back out on the
//! response header, and each call is timed and counted under its route template.

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

use crate::metrics;

/// Correlation header read from requests and written to responses
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Label used when no route matched, e.g. for 404s
const UNMATCHED_ROUTE: &str = "unmatched";

fn incoming_or_new_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Route template such as `/api/v1/tournaments/{tournament_id}`.
/// Raw paths would give every ID its own metric series.
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_string(), |p| p.as_str().to_string())
}

/// Tag the call with a correlation ID, then log and meter its outcome.
///
/// Installed on the whole router with `axum::middleware::from_fn`, see
/// [`create_router`](super::create_router).
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_or_new_id(request.headers());
    request.extensions_mut().insert(RequestId(request_id.clone()));

    let method = request.method().clone();
    let route = route_label(&request);
    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %request.uri(),
        "Request started"
    );

    let started = Instant::now();
    let (mut parts, body) = next.run(request).await.into_parts();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID_HEADER, value);
    }

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    metrics::http_requests_total(method.as_str(), &route, parts.status.as_u16());
    metrics::http_request_duration_ms(method.as_str(), &route, elapsed_ms);
    tracing::info!(
        request_id = %request_id,
        route = %route,
        status = %parts.status,
        duration_ms = elapsed_ms,
        "Request completed"
    );

    Response::from_parts(parts, body)
}

/// Correlation ID of the current call, available to every handler
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> axum::extract::FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestId>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Handler mounted outside the request ID middleware",
        ))
    }
}
