use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    cache::ResponseCache,
    config::Config,
    trends::{types::RelatedQueries, TrendsService},
    utils::{format_timestamp, related_cache_key, TRENDS_CACHE_KEY},
};

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<ResponseCache>,
    pub trends: Arc<TrendsService>,
}

impl AppState {
    fn timestamp(&self) -> String {
        format_timestamp(chrono::Utc::now(), &self.config.app_timezone)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub keyword: String,
    pub related: RelatedQueries,
    pub timestamp: String,
}

// Route handlers
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(INDEX_TEMPLATE.replace("{{ current_time }}", &state.timestamp()))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_trends(State(state): State<AppState>) -> Response {
    if let Some(cached) = state.cache.get(TRENDS_CACHE_KEY).await {
        return Json(cached).into_response();
    }

    let response = TrendsResponse {
        trends: state.trends.fetch_realtime_trends().await,
        timestamp: state.timestamp(),
    };

    store_in_cache(&state.cache, TRENDS_CACHE_KEY, &response).await;
    Json(response).into_response()
}

pub async fn get_related(State(state): State<AppState>, Path(keyword): Path<String>) -> Response {
    let cache_key = related_cache_key(&keyword);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Json(cached).into_response();
    }

    let related = state
        .trends
        .fetch_related(&keyword, &state.config.trends_default_region)
        .await;
    let response = RelatedResponse {
        keyword,
        related,
        timestamp: state.timestamp(),
    };

    store_in_cache(&state.cache, &cache_key, &response).await;
    Json(response).into_response()
}

async fn store_in_cache<T: Serialize>(cache: &ResponseCache, key: &str, response: &T) {
    match serde_json::to_value(response) {
        Ok(value) => cache.set(key, value).await,
        Err(e) => tracing::error!("Could not cache '{}': {}", key, e),
    }
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/trends", get(get_trends))
        .route("/api/related/:keyword", get(get_related))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::fallback::fallback_trends;
    use crate::trends::mock::{tables, MockTrendsProvider};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app(provider: Arc<MockTrendsProvider>) -> Router {
        let config = Config::default();
        let state = AppState {
            cache: Arc::new(ResponseCache::new(config.cache_max_capacity, config.cache_ttl())),
            trends: Arc::new(TrendsService::new(provider, Duration::ZERO)),
            config: Arc::new(config),
        };
        create_router(state)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_trends_fallback_and_cache() {
        let provider = Arc::new(MockTrendsProvider::new());
        let app = test_app(provider.clone());

        let (status, first) = get_json(&app, "/api/trends").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["trends"], json!(fallback_trends()));
        assert!(first["timestamp"].is_string());
        assert_eq!(provider.call_count(), 4);

        let (_, second) = get_json(&app, "/api/trends").await;
        assert_eq!(second, first);
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_related_response_shape() {
        let provider = Arc::new(MockTrendsProvider::new().with_related(
            "KR",
            tables(
                "날씨",
                vec![json!({"query": "날씨 예보", "value": 100})],
                vec![json!({"query": "장마"})],
            ),
        ));
        let app = test_app(provider.clone());

        let (status, body) = get_json(&app, "/api/related/%EB%82%A0%EC%94%A8").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keyword"], "날씨");
        assert_eq!(
            body["related"],
            json!({
                "top": [{"query": "날씨 예보", "value": 100}],
                "rising": [{"query": "장마", "value": "Infinity"}],
            })
        );
        assert!(body["timestamp"].is_string());
        assert_eq!(provider.calls()[0].geo, "KR");
    }

    #[tokio::test]
    async fn test_related_cache_is_per_keyword() {
        let provider = Arc::new(MockTrendsProvider::new());
        let app = test_app(provider.clone());

        let (_, body) = get_json(&app, "/api/related/rust").await;
        assert_eq!(body["related"], json!({"top": [], "rising": []}));
        assert_eq!(provider.call_count(), 4);

        get_json(&app, "/api/related/rust").await;
        assert_eq!(provider.call_count(), 4);

        get_json(&app, "/api/related/go").await;
        assert_eq!(provider.call_count(), 8);
    }

    #[tokio::test]
    async fn test_index_page_has_timestamp() {
        let app = test_app(Arc::new(MockTrendsProvider::new()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(!html.contains("{{ current_time }}"));
        assert!(html.contains("페이지 생성 시각: 20"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(Arc::new(MockTrendsProvider::new()));

        let (status, body) = get_json(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}
