use super::provider::{TrendsError, TrendsProvider};
use super::types::*;
use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::OnceCell;

const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
const RELATED_SEARCHES_PATH: &str = "/trends/api/widgetdata/relatedsearches";

const TIMESERIES_WIDGET: &str = "TIMESERIES";
const RELATED_QUERIES_WIDGET: &str = "RELATED_QUERIES";

pub struct GoogleTrendsClient {
    client: Client,
    config: Config,
    session: OnceCell<()>,
}

impl GoogleTrendsClient {
    pub fn new(config: Config) -> Result<Self, TrendsError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; TrendsProxy/1.0)")
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(config.trends_connect_timeout_secs))
            .timeout(Duration::from_secs(config.trends_read_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            session: OnceCell::new(),
        })
    }

    /// Google hands out the session cookie on the landing page; explore
    /// requests without it are answered with 429. A failed warm-up leaves
    /// the session unset so the next request tries again.
    async fn ensure_session(&self) -> Result<(), TrendsError> {
        self.session
            .get_or_try_init(|| async {
                let geo = self.config.trends_default_region.as_str();
                let url = format!("{}/", self.config.trends_base_url);
                let response = self.client.get(&url).query(&[("geo", geo)]).send().await?;
                let status = response.status();
                tracing::debug!("Trends session warm-up returned {}", status);

                let outcome: Result<(), TrendsError> = match status {
                    reqwest::StatusCode::TOO_MANY_REQUESTS => Err(TrendsError::RateLimited),
                    status if !status.is_success() => Err(TrendsError::ApiError(format!(
                        "session warm-up returned HTTP {}",
                        status
                    ))),
                    _ => Ok(()),
                };
                outcome
            })
            .await
            .map(|_| ())
    }

    async fn explore(&self, payload: &Payload) -> Result<Vec<ExploreWidget>, TrendsError> {
        self.ensure_session().await?;

        let comparison_items: Vec<Value> = payload
            .keywords
            .iter()
            .map(|keyword| {
                json!({
                    "keyword": keyword,
                    "time": payload.timeframe,
                    "geo": payload.geo,
                })
            })
            .collect();
        let req = json!({
            "comparisonItem": comparison_items,
            "category": 0,
            "property": "",
        });

        let url = format!("{}{}", self.config.trends_base_url, EXPLORE_PATH);
        let request = self.client.post(&url).query(&[
            ("hl", self.config.trends_hl.clone()),
            ("tz", self.config.trends_tz.to_string()),
            ("req", req.to_string()),
        ]);

        let explore: ExploreResponse = self.fetch_json(request).await?;
        Ok(explore.widgets)
    }

    async fn widget_data<T: DeserializeOwned>(
        &self,
        path: &str,
        widget: &ExploreWidget,
    ) -> Result<T, TrendsError> {
        let url = format!("{}{}", self.config.trends_base_url, path);
        let request = self.client.get(&url).query(&[
            ("hl", self.config.trends_hl.clone()),
            ("tz", self.config.trends_tz.to_string()),
            ("req", widget.request.to_string()),
            ("token", widget.token.clone()),
        ]);

        self.fetch_json(request).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TrendsError> {
        let response = request.send().await?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let body = response.text().await?;
                let parsed = serde_json::from_str(strip_json_prefix(&body))?;
                Ok(parsed)
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(TrendsError::RateLimited),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(TrendsError::ApiError(format!("HTTP {}: {}", status, error_text)))
            }
        }
    }
}

#[async_trait]
impl TrendsProvider for GoogleTrendsClient {
    async fn interest_over_time(&self, payload: &Payload) -> Result<InterestOverTime, TrendsError> {
        let widgets = self.explore(payload).await?;
        let widget = widgets
            .iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or(TrendsError::MissingWidget(TIMESERIES_WIDGET))?;

        let response: MultilineResponse = self.widget_data(MULTILINE_PATH, widget).await?;
        interest_from_timeline(&payload.keywords, response.default.timeline_data)
    }

    async fn related_queries(&self, payload: &Payload) -> Result<RelatedTablesByKeyword, TrendsError> {
        let widgets = self.explore(payload).await?;
        let related_widgets: Vec<&ExploreWidget> = widgets
            .iter()
            .filter(|w| w.id.contains(RELATED_QUERIES_WIDGET))
            .collect();

        if related_widgets.is_empty() {
            return Err(TrendsError::MissingWidget(RELATED_QUERIES_WIDGET));
        }

        let mut tables = RelatedTablesByKeyword::new();
        for widget in related_widgets {
            let keyword = widget_keyword(&widget.request).unwrap_or_default();
            let response: RelatedSearchesResponse =
                self.widget_data(RELATED_SEARCHES_PATH, widget).await?;
            tables.insert(keyword, tables_from_ranked_lists(response.default.ranked_list));
        }

        Ok(tables)
    }
}

/// Widget endpoints prefix their JSON with `)]}'` (and sometimes a comma)
/// to defeat script inclusion.
fn strip_json_prefix(body: &str) -> &str {
    match body.find(['{', '[']) {
        Some(start) => &body[start..],
        None => body,
    }
}

fn interest_from_timeline(
    keywords: &[String],
    timeline: Vec<TimelinePoint>,
) -> Result<InterestOverTime, TrendsError> {
    let mut rows = Vec::with_capacity(timeline.len());

    for point in timeline {
        let time = point
            .time
            .parse::<i64>()
            .map_err(|_| TrendsError::MalformedResponse(format!("bad timeline time {:?}", point.time)))?;
        if point.value.len() != keywords.len() {
            return Err(TrendsError::MalformedResponse(format!(
                "timeline row has {} values for {} keywords",
                point.value.len(),
                keywords.len()
            )));
        }
        rows.push(InterestRow {
            time,
            values: point.value,
            is_partial: point.is_partial,
        });
    }

    if let Some(label) = timeline_label(&rows) {
        tracing::debug!("Interest timeline ends at {}", label);
    }

    Ok(InterestOverTime {
        keywords: keywords.to_vec(),
        rows,
    })
}

fn timeline_label(rows: &[InterestRow]) -> Option<String> {
    let last = rows.last()?;
    let ts = chrono::DateTime::from_timestamp(last.time, 0)?;
    Some(format!("{}{}", ts, if last.is_partial { " (partial)" } else { "" }))
}

fn widget_keyword(request: &Value) -> Option<String> {
    request
        .pointer("/restriction/complexKeywordsRestriction/keyword/0/value")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// The first ranked list holds the top queries, the second the rising ones.
fn tables_from_ranked_lists(ranked_list: Vec<RankedList>) -> RelatedTables {
    let mut lists = ranked_list.into_iter().map(|list| list.ranked_keyword);
    RelatedTables {
        top: lists.next(),
        rising: lists.next(),
    }
}
