use super::provider::{TrendsError, TrendsProvider};
use super::types::*;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted provider keyed by region. Regions without a script fail, and
/// every call is recorded so tests can assert on the attempted regions.
#[derive(Default)]
pub struct MockTrendsProvider {
    interest: HashMap<String, InterestOverTime>,
    related: HashMap<String, RelatedTablesByKeyword>,
    failing: Vec<String>,
    calls: Mutex<Vec<Payload>>,
}

impl MockTrendsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interest(mut self, region: &str, data: InterestOverTime) -> Self {
        self.interest.insert(region.to_string(), data);
        self
    }

    pub fn with_related(mut self, region: &str, data: RelatedTablesByKeyword) -> Self {
        self.related.insert(region.to_string(), data);
        self
    }

    pub fn with_failure(mut self, region: &str) -> Self {
        self.failing.push(region.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Payload> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, payload: &Payload) -> Result<(), TrendsError> {
        self.calls.lock().unwrap().push(payload.clone());
        if self.failing.contains(&payload.geo) {
            return Err(TrendsError::RateLimited);
        }
        Ok(())
    }
}

#[async_trait]
impl TrendsProvider for MockTrendsProvider {
    async fn interest_over_time(&self, payload: &Payload) -> Result<InterestOverTime, TrendsError> {
        self.record(payload)?;
        self.interest
            .get(&payload.geo)
            .cloned()
            .ok_or_else(|| TrendsError::ApiError(format!("no interest scripted for {}", payload.geo)))
    }

    async fn related_queries(&self, payload: &Payload) -> Result<RelatedTablesByKeyword, TrendsError> {
        self.record(payload)?;
        self.related
            .get(&payload.geo)
            .cloned()
            .ok_or_else(|| TrendsError::ApiError(format!("no related scripted for {}", payload.geo)))
    }
}

/// Build an interest table with one row per slice of values.
pub fn interest(keywords: &[&str], rows: &[&[i64]]) -> InterestOverTime {
    InterestOverTime {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        rows: rows
            .iter()
            .enumerate()
            .map(|(i, values)| InterestRow {
                time: 1_700_000_000 + i as i64 * 3600,
                values: values.to_vec(),
                is_partial: i + 1 == rows.len(),
            })
            .collect(),
    }
}

/// Related tables for a single keyword; empty vectors become absent tables.
pub fn tables(keyword: &str, top: Vec<Value>, rising: Vec<Value>) -> RelatedTablesByKeyword {
    let non_empty = |rows: Vec<Value>| if rows.is_empty() { None } else { Some(rows) };
    let mut by_keyword = RelatedTablesByKeyword::new();
    by_keyword.insert(
        keyword.to_string(),
        RelatedTables {
            top: non_empty(top),
            rising: non_empty(rising),
        },
    );
    by_keyword
}
