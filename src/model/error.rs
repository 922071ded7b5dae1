use thiserror::Error;

/// Caller-visible conditions from the location recommendation.
///
/// These are recoverable business-level outcomes, not failures: an unknown
/// location name is a different state than a known location with no matching
/// rows, and callers present the two differently. Display strings match the
/// wire messages the API returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
    #[error("No items found for location: {0}")]
    NoItemsFound(String),
}
