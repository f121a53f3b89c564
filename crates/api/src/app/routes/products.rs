use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/search", get(search_products))
        .route("/:id", get(get_product))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let snapshot = services.engine().list();
    Json(dto::ListProductsResponse {
        products: snapshot.products(),
    })
    .into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.engine().get_by_id(&id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::query_error_to_response(e),
    }
}

pub async fn search_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::SearchParams>,
) -> Json<dto::SearchProductsResponse> {
    Json(dto::SearchProductsResponse {
        results: services.engine().search(&params.query),
    })
}
