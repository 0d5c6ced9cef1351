//! Route handlers for the idea-generation API

pub mod idea_routes;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use serde_json::Value;

/// Build a JSON response carrying the base headers.
///
/// Every response from this API is marked `no-store`: generated ideas are
/// request-specific and must never be served from a cache.
pub fn json_response(status: StatusCode, body: &Value) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(body.to_string()))
        .unwrap()
}
