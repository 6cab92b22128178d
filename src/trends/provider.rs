use super::types::{InterestOverTime, Payload, RelatedTablesByKeyword};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendsError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("Rate limited by trends provider")]
    RateLimited,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Explore response has no {0} widget")]
    MissingWidget(&'static str),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Source of Google Trends style data.
///
/// Every call is self-contained: the payload carries the keywords,
/// timeframe and region, so implementations hold no per-query state.
#[async_trait]
pub trait TrendsProvider: Send + Sync {
    async fn interest_over_time(&self, payload: &Payload) -> Result<InterestOverTime, TrendsError>;

    /// Related-query tables keyed by the keyword they belong to.
    async fn related_queries(&self, payload: &Payload) -> Result<RelatedTablesByKeyword, TrendsError>;
}
