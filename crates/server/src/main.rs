use std::sync::Arc;

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use common::Config;
use geocode::GeocodeClient;
use server::{routes, AppState, TrendsPipeline};
use summarizer::SummaryClient;
use trends_feed::FeedFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Trends server starting up");

    let config = Config::from_env()?;
    let api_key = config.require_openai_api_key()?.clone();

    let resolver = GeocodeClient::new(&config.nominatim_url);
    let fetcher = FeedFetcher::new(&config.trends_feed_url);
    let summarizer = SummaryClient::new(&api_key, config.summary.clone());
    let pipeline = TrendsPipeline::new(resolver.clone(), fetcher, summarizer);

    let state = Arc::new(AppState { resolver, pipeline });
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
