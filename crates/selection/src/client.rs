use async_trait::async_trait;
use serde::Deserialize;

use common::RegionCode;
use trends_feed::TrendRecord;

/// Outcome of one pipeline invocation as seen by the client. Errors carry
/// the server's literal message; the client renders it and does not retry.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Success {
        trends: Vec<TrendRecord>,
        summary: String,
    },
    Failure {
        error: String,
    },
}

/// Seam between the selection driver and the trends endpoint, so tests can
/// stub the network.
#[async_trait]
pub trait PipelineClient: Send + Sync {
    async fn run_pipeline(&self, region: &RegionCode, location_name: &str) -> PipelineOutcome;
}

#[derive(Debug, Deserialize)]
struct TrendsResponseBody {
    #[serde(default)]
    trends: Vec<TrendRecord>,
    #[serde(default)]
    summary: String,
    error: Option<String>,
}

/// Talks to `GET /api/trends` on the server.
pub struct HttpPipelineClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPipelineClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PipelineClient for HttpPipelineClient {
    async fn run_pipeline(&self, region: &RegionCode, location_name: &str) -> PipelineOutcome {
        let url = format!("{}/api/trends", self.base_url);
        let result = self
            .client
            .get(&url)
            .query(&[("location", region.as_str()), ("locationName", location_name)])
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                return PipelineOutcome::Failure {
                    error: format!("Failed to fetch trends data: {e}"),
                }
            }
        };

        let body = match resp.json::<TrendsResponseBody>().await {
            Ok(body) => body,
            Err(e) => {
                return PipelineOutcome::Failure {
                    error: format!("Failed to fetch trends data: {e}"),
                }
            }
        };

        match body.error {
            Some(error) => PipelineOutcome::Failure { error },
            None => PipelineOutcome::Success {
                trends: body.trends,
                summary: body.summary,
            },
        }
    }
}
