use serde::{Deserialize, Serialize};

use catalogd_core::Product;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SetFlagRequest {
    pub enabled: bool,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ListProductsResponse<'a> {
    pub products: &'a [Product],
}

#[derive(Debug, Serialize)]
pub struct SearchProductsResponse {
    pub results: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct FlagResponse {
    pub flag: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub generation: u64,
    pub products: usize,
    pub loaded_at: String,
}
