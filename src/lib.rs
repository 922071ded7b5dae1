pub mod api;
pub mod config;
pub mod ingest;
pub mod logic;
pub mod model;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export the query engine
pub use logic::{
    dynamic_price, filter_by_category, inventory_recommendation, location_recommendation,
    profitable_items, stock_recommendation, DEFAULT_TOP_N,
};

// Export all model types
pub use model::*;

// Export the dataset loader
pub use ingest::{load_dataset, sample_dataset, LoadReport, RowError};
