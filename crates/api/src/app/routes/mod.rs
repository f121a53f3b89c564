use axum::{
    routing::{get, put},
    Router,
};

pub mod flags;
pub mod products;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .route("/flags/:name", put(flags::set_flag).get(flags::get_flag))
        .nest("/products", products::router())
}
