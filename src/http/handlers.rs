//! Route handlers.

use std::net::SocketAddr;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::edge::outcome::{Invalid, MSG_METHOD_NOT_ALLOWED};
use crate::edge::{IncomingSubmission, Outcome};
use crate::http::request::{origin_host, request_id, resolve_client_address};
use crate::http::response::error_response;
use crate::http::server::AppState;
use crate::observability::metrics;

/// POST handler for the contact endpoint.
pub async fn submit_contact(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let config = state.config.load_full();
    let (parts, body) = request.into_parts();

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = resolve_client_address(&parts.headers, peer);

    let payload = match axum::body::to_bytes(body, config.security.max_body_size).await {
        Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        Err(_) => None,
    };
    let Some(payload) = payload else {
        tracing::debug!(
            request_id = %request_id(&parts.headers),
            client = %client,
            "Unreadable submission body"
        );
        metrics::record_outcome("invalid");
        return Outcome::Invalid(Invalid::Body).into_response();
    };

    let submission = IncomingSubmission {
        payload,
        client,
        origin_host: origin_host(&parts.headers),
    };

    state
        .service
        .handle(&config, submission, crate::now_millis())
        .await
        .into_response()
}

/// Bare OPTIONS without CORS request headers: acknowledge with an empty body.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    let mut response = error_response(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED);
    response
        .headers_mut()
        .insert(header::ALLOW, header::HeaderValue::from_static("POST, OPTIONS"));
    response
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
