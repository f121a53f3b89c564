use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Flip an in-process flag. Stands in for the external flag backend when
/// running chaos scenarios locally.
pub async fn set_flag(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    Json(body): Json<dto::SetFlagRequest>,
) -> Json<dto::FlagResponse> {
    services.flags().set(name.clone(), body.enabled);
    info!(flag = %name, enabled = body.enabled, "feature flag updated");
    Json(dto::FlagResponse {
        flag: name,
        enabled: body.enabled,
    })
}

pub async fn get_flag(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.flags().get(&name) {
        Some(enabled) => Json(dto::FlagResponse { flag: name, enabled }).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("flag not set: {name}")),
    }
}
