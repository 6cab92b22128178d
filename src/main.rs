use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod config;
mod routes;
mod trends;
mod utils;

use cache::ResponseCache;
use config::Config;
use routes::{create_router, AppState};
use trends::{google::GoogleTrendsClient, TrendsService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trends_proxy_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // The provider client is built once and shared by every request
    let provider = Arc::new(GoogleTrendsClient::new(config.clone())?);
    let trends = Arc::new(TrendsService::new(provider, config.request_delay()));

    let cache = Arc::new(ResponseCache::new(config.cache_max_capacity, config.cache_ttl()));

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        cache,
        trends,
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server starting on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
