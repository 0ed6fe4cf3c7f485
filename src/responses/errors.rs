use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    blocked: bool,
}

/// Convert a ServerError into `{ "error": ..., "blocked"?: true }`.
pub fn json_error_response(err: ServerError) -> Response {
    let status = err.status();
    if status >= 500 {
        error!(status, "{err}");
    } else {
        warn!(status, "{err}");
    }

    let body = ErrorBody {
        error: err.to_string(),
        blocked: err.is_blocked(),
    };
    let json = serde_json::to_string(&body)
        .unwrap_or_else(|_| r#"{"error":"Internal Server Error"}"#.to_string());

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(json))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
