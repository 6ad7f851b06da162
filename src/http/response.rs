//! Response mapping.
//!
//! Every JSON body the endpoint produces goes through here, so the wire
//! shape stays `{ "success": true }` or `{ "error": "..." }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::edge::Outcome;
use crate::submission::ContactReply;

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        let (status, body) = self.reply();
        (status, Json(body)).into_response()
    }
}

/// JSON error body with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ContactReply::error(message))).into_response()
}
