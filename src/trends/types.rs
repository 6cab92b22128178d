use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// One query against the trends provider: which keywords, over which
/// timeframe, in which region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub keywords: Vec<String>,
    pub timeframe: String,
    pub geo: String,
}

impl Payload {
    pub fn new(keywords: Vec<String>, timeframe: &str, geo: &str) -> Self {
        Self {
            keywords,
            timeframe: timeframe.to_string(),
            geo: geo.to_string(),
        }
    }
}

/// Interest-over-time table. `values` of each row line up with `keywords`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterestOverTime {
    pub keywords: Vec<String>,
    pub rows: Vec<InterestRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterestRow {
    pub time: i64,
    pub values: Vec<i64>,
    pub is_partial: bool,
}

impl InterestOverTime {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Raw related-query tables for one keyword. Rows are kept as JSON so
/// that a malformed row can be skipped without losing the whole table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelatedTables {
    pub top: Option<Vec<Value>>,
    pub rising: Option<Vec<Value>>,
}

pub type RelatedTablesByKeyword = HashMap<String, RelatedTables>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopQuery {
    pub query: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RisingQuery {
    pub query: String,
    pub value: RisingValue,
}

/// Growth of a rising query, or the `"Infinity"` sentinel when the
/// provider reports no bounded figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RisingValue {
    Growth(i64),
    Unbounded,
}

impl Serialize for RisingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RisingValue::Growth(value) => serializer.serialize_i64(*value),
            RisingValue::Unbounded => serializer.serialize_str("Infinity"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelatedQueries {
    pub top: Vec<TopQuery>,
    pub rising: Vec<RisingQuery>,
}

impl RelatedQueries {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.rising.is_empty()
    }
}

// Google Trends wire format

#[derive(Debug, Clone, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExploreWidget {
    pub id: String,
    pub token: String,
    pub request: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultilineResponse {
    pub default: MultilineData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultilineData {
    #[serde(default)]
    pub timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub time: String,
    #[serde(default)]
    pub value: Vec<i64>,
    #[serde(default)]
    pub is_partial: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedSearchesResponse {
    pub default: RelatedSearchesData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedSearchesData {
    #[serde(default)]
    pub ranked_list: Vec<RankedList>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedList {
    #[serde(default)]
    pub ranked_keyword: Vec<Value>,
}
