use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logic;
use crate::model::Dataset;

pub type AppState = Arc<Dataset>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RankedQuery {
    pub top_n: Option<usize>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub shop_id: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PricingQuery {
    pub item: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PopularItemsResponse {
    pub popular_items: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfitableItemsResponse {
    pub profitable_items: Vec<String>,
}

/// Location results and their business-level conditions (invalid location,
/// no items found) share a 200 status on the wire; only a missing parameter
/// is a 400.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LocationRecommendationResponse {
    Items { location_recommendations: Vec<String> },
    Error { error: String },
}

#[derive(Debug, Serialize)]
pub struct InventoryRecommendationResponse {
    pub shop_id: String,
    pub inventory_based_items: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StockRecommendationResponse {
    pub stock_recommendation: Vec<String>,
}

/// `null` is the "no data" signal; it is never conflated with a price of 0.
#[derive(Debug, Serialize)]
pub struct DynamicPricingResponse {
    pub suggested_price: Option<f64>,
}

pub async fn recommend_popular(
    State(data): State<AppState>,
    Query(params): Query<RankedQuery>,
) -> Json<PopularItemsResponse> {
    let top_n = params.top_n.unwrap_or(logic::DEFAULT_TOP_N);
    let category = params.category.as_deref().map(str::trim);
    Json(PopularItemsResponse {
        popular_items: logic::profitable_items(&data, top_n, category),
    })
}

pub async fn recommend_profitable(
    State(data): State<AppState>,
    Query(params): Query<RankedQuery>,
) -> Json<ProfitableItemsResponse> {
    let top_n = params.top_n.unwrap_or(logic::DEFAULT_TOP_N);
    Json(ProfitableItemsResponse {
        profitable_items: logic::profitable_items(&data, top_n, params.category.as_deref()),
    })
}

pub async fn recommend_location(
    State(data): State<AppState>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<LocationRecommendationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let location = params.location.as_deref().unwrap_or("");
    if location.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Location is required")),
        ));
    }

    let result = logic::location_recommendation(&data, location, params.category.as_deref());
    Ok(Json(match result {
        Ok(items) => LocationRecommendationResponse::Items {
            location_recommendations: items,
        },
        Err(condition) => LocationRecommendationResponse::Error {
            error: condition.to_string(),
        },
    }))
}

pub async fn recommend_inventory(
    State(data): State<AppState>,
    Query(params): Query<ShopQuery>,
) -> Result<Json<InventoryRecommendationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let shop_id = params.shop_id.as_deref().unwrap_or("").trim();
    if shop_id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Shop ID is required")),
        ));
    }

    Ok(Json(InventoryRecommendationResponse {
        shop_id: shop_id.to_string(),
        inventory_based_items: logic::inventory_recommendation(
            &data,
            shop_id,
            params.category.as_deref(),
        ),
    }))
}

pub async fn recommend_stock(
    State(data): State<AppState>,
    Query(params): Query<ShopQuery>,
) -> Result<Json<StockRecommendationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let shop_id = params.shop_id.as_deref().unwrap_or("");
    if shop_id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Shop ID is required")),
        ));
    }

    Ok(Json(StockRecommendationResponse {
        stock_recommendation: logic::stock_recommendation(
            &data,
            shop_id,
            params.category.as_deref(),
        ),
    }))
}

pub async fn recommend_dynamic_pricing(
    State(data): State<AppState>,
    Query(params): Query<PricingQuery>,
) -> Result<Json<DynamicPricingResponse>, (StatusCode, Json<ErrorResponse>)> {
    let item = params.item.as_deref().unwrap_or("");
    if item.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Item is required")),
        ));
    }

    // Same normalization the loader applied to item names, plus stripping of
    // line breaks that tend to sneak into pasted input.
    let item = item.trim().to_lowercase().replace(['\r', '\n'], "");

    Ok(Json(DynamicPricingResponse {
        suggested_price: logic::dynamic_price(&data, &item, params.category.as_deref()),
    }))
}
