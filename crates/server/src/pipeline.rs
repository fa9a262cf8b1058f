use common::{RegionCode, TrendsResult};
use geocode::{Coordinate, GeocodeClient};
use serde::Serialize;
use summarizer::SummaryClient;
use tracing::info;
use trends_feed::{normalize_feed, FeedFetcher, TrendRecord};

/// What a pipeline run is keyed on: an already-known region, or a coordinate
/// pair that must be resolved first.
#[derive(Debug, Clone)]
pub enum Selector {
    Region(RegionCode),
    Coords(Coordinate),
}

#[derive(Debug, Serialize)]
pub struct TrendsPayload {
    pub trends: Vec<TrendRecord>,
    pub summary: String,
}

/// Runs the full resolve -> fetch -> normalize -> summarize sequence. The
/// result is all-or-nothing: the first failing stage short-circuits and no
/// partial payload is produced. Repeated runs are independent; there is no
/// caching in front of this.
pub struct TrendsPipeline {
    resolver: GeocodeClient,
    fetcher: FeedFetcher,
    summarizer: SummaryClient,
}

impl TrendsPipeline {
    pub fn new(resolver: GeocodeClient, fetcher: FeedFetcher, summarizer: SummaryClient) -> Self {
        Self {
            resolver,
            fetcher,
            summarizer,
        }
    }

    pub async fn run(&self, selector: Selector, location_name: &str) -> TrendsResult<TrendsPayload> {
        let region = match selector {
            Selector::Region(region) => region,
            Selector::Coords(coord) => self.resolver.resolve(coord).await?,
        };

        info!("Running trends pipeline for {} ({})", region, location_name);

        let xml = self.fetcher.fetch(&region).await?;
        let trends = normalize_feed(&xml)?;
        info!("Extracted {} trends for {}", trends.len(), region);

        let titles: Vec<String> = trends.iter().map(|t| t.title.clone()).collect();
        let summary = self.summarizer.summarize(&titles, location_name).await?;

        Ok(TrendsPayload { trends, summary })
    }
}
