use super::fallback;
use super::types::{Payload, RelatedQueries, RelatedTables, RisingQuery, RisingValue, TopQuery};
use super::{RegionAttempt, TrendsService};
use serde_json::{Map, Value};
use thiserror::Error;

/// Tried in order after the caller's preferred region.
pub const FALLBACK_REGIONS: [&str; 3] = ["US", "GB", "JP"];

pub const RELATED_TIMEFRAME: &str = "today 3-m";

/// Stands in for a row whose `query` field is missing.
pub const UNKNOWN_QUERY: &str = "알 수 없음";

#[derive(Error, Debug, PartialEq)]
pub enum RowError {
    #[error("row is not an object: {0}")]
    NotAnObject(Value),
    #[error("query is not a string: {0}")]
    InvalidQuery(Value),
    #[error("value is not an integer: {0}")]
    InvalidValue(Value),
}

impl TrendsService {
    pub async fn fetch_related(&self, keyword: &str, preferred_region: &str) -> RelatedQueries {
        tracing::info!("Fetching related queries for '{}'", keyword);

        let regions = std::iter::once(preferred_region).chain(FALLBACK_REGIONS);
        for region in regions {
            match self.attempt_related(keyword, region).await {
                RegionAttempt::Found(related) => {
                    tracing::info!(
                        "Found related queries for '{}' in {} ({} top, {} rising)",
                        keyword,
                        region,
                        related.top.len(),
                        related.rising.len()
                    );
                    return related;
                }
                RegionAttempt::Empty => {
                    tracing::warn!("No related queries for '{}' in {}", keyword, region);
                }
                RegionAttempt::Failed(e) => {
                    tracing::error!("Related queries attempt for '{}' in {} failed: {}", keyword, region, e);
                }
            }
        }

        if fallback::is_common_keyword(keyword) {
            tracing::info!("Serving sample related queries for '{}'", keyword);
            return fallback::sample_related_queries(keyword);
        }

        tracing::warn!("No related queries found for '{}'", keyword);
        RelatedQueries::default()
    }

    async fn attempt_related(&self, keyword: &str, region: &str) -> RegionAttempt<RelatedQueries> {
        self.pause().await;

        let payload = Payload::new(vec![keyword.to_string()], RELATED_TIMEFRAME, region);
        let mut by_keyword = match self.provider.related_queries(&payload).await {
            Ok(tables) => tables,
            Err(e) => return RegionAttempt::Failed(e),
        };

        let Some(tables) = by_keyword.remove(keyword) else {
            return RegionAttempt::Empty;
        };

        let related = normalize_tables(&tables);
        if related.is_empty() {
            RegionAttempt::Empty
        } else {
            RegionAttempt::Found(related)
        }
    }
}

/// Turn raw top/rising tables into uniform records, dropping rows that
/// cannot be read.
pub fn normalize_tables(tables: &RelatedTables) -> RelatedQueries {
    let top = tables
        .top
        .as_deref()
        .map(|rows| collect_rows(rows, "top", top_row))
        .unwrap_or_default();
    let rising = tables
        .rising
        .as_deref()
        .map(|rows| collect_rows(rows, "rising", rising_row))
        .unwrap_or_default();

    RelatedQueries { top, rising }
}

fn collect_rows<T>(rows: &[Value], table: &str, extract: fn(&Value) -> Result<T, RowError>) -> Vec<T> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match extract(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!("Skipping {} row {}: {}", table, index, e);
                None
            }
        })
        .collect()
}

pub fn top_row(row: &Value) -> Result<TopQuery, RowError> {
    let fields = row_fields(row)?;
    let value = match fields.get("value") {
        None | Some(Value::Null) => 0,
        Some(raw) => parse_integer(raw).ok_or_else(|| RowError::InvalidValue(raw.clone()))?,
    };

    Ok(TopQuery {
        query: row_query(fields)?,
        value,
    })
}

pub fn rising_row(row: &Value) -> Result<RisingQuery, RowError> {
    let fields = row_fields(row)?;
    let value = match fields.get("value") {
        None | Some(Value::Null) => RisingValue::Unbounded,
        Some(raw) => RisingValue::Growth(
            parse_integer(raw).ok_or_else(|| RowError::InvalidValue(raw.clone()))?,
        ),
    };

    Ok(RisingQuery {
        query: row_query(fields)?,
        value,
    })
}

fn row_fields(row: &Value) -> Result<&Map<String, Value>, RowError> {
    row.as_object().ok_or_else(|| RowError::NotAnObject(row.clone()))
}

fn row_query(fields: &Map<String, Value>) -> Result<String, RowError> {
    match fields.get("query") {
        None | Some(Value::Null) => Ok(UNKNOWN_QUERY.to_string()),
        Some(Value::String(query)) => Ok(query.clone()),
        Some(other) => Err(RowError::InvalidQuery(other.clone())),
    }
}

/// Integers, floats (truncated) and numeric strings are accepted.
fn parse_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
