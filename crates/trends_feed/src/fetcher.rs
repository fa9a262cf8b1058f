use common::{RegionCode, TrendsError, TrendsResult};
use reqwest::Client;
use tracing::info;

/// Retrieves a region's trending-topics feed as raw RSS text. Parsing is the
/// normalizer's job; keeping the two apart separates transport failures from
/// schema failures.
#[derive(Clone)]
pub struct FeedFetcher {
    client: Client,
    base_url: String,
}

impl FeedFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch(&self, region: &RegionCode) -> TrendsResult<String> {
        let url = format!("{}?geo={}", self.base_url, region.as_str());
        info!("Fetching trends feed for {}", region);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrendsError::UpstreamUnavailable(format!("trends feed request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TrendsError::UpstreamUnavailable(format!(
                "trends feed returned status {status}"
            )));
        }

        resp.text()
            .await
            .map_err(|e| TrendsError::UpstreamUnavailable(format!("trends feed body unreadable: {e}")))
    }
}
