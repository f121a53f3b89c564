use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalogd_core::QueryError;

pub fn query_error_to_response(err: QueryError) -> axum::response::Response {
    match err {
        QueryError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        // Injected faults must look like real server errors to callers.
        QueryError::InjectedFault => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
