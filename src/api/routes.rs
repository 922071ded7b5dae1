use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers;
use crate::model::Dataset;

pub fn create_router() -> Router<Arc<Dataset>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ranking recommendations ("popular" is an alias of the profitable
        // ranking, see DESIGN.md)
        .route("/recommend/popular", get(handlers::recommend_popular))
        .route("/recommend/profitable", get(handlers::recommend_profitable))
        // Location-based best sellers
        .route("/recommend/location", get(handlers::recommend_location))
        // Per-shop recommendations
        .route("/recommend/inventory", get(handlers::recommend_inventory))
        .route("/recommend/stock", get(handlers::recommend_stock))
        // Pricing
        .route(
            "/recommend/dynamic-pricing",
            get(handlers::recommend_dynamic_pricing),
        )
}
