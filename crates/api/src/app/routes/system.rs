use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};

use catalogd_observability::MetricsSnapshot;

use crate::app::dto;
use crate::app::services::AppServices;

/// Reports `ok` only once a catalog has been installed.
pub async fn health(
    Extension(services): Extension<Arc<AppServices>>,
) -> (StatusCode, Json<dto::HealthResponse>) {
    // Straight from the store: health checks are not list queries.
    let snapshot = services.engine().store().snapshot();
    let (status, label) = if snapshot.generation() > 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "loading")
    };

    (
        status,
        Json(dto::HealthResponse {
            status: label,
            generation: snapshot.generation(),
            products: snapshot.len(),
            loaded_at: snapshot.loaded_at().to_rfc3339(),
        }),
    )
}

pub async fn metrics(Extension(services): Extension<Arc<AppServices>>) -> Json<MetricsSnapshot> {
    Json(services.engine().metrics().snapshot())
}
