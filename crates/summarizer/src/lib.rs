use common::{SummaryConfig, TrendsError, TrendsResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Chat-completions client that turns a list of trend titles into a short
/// analytical summary. Bounded output and a fixed non-zero temperature keep
/// the phrasing varied but not erratic.
#[derive(Clone)]
pub struct SummaryClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    config: SummaryConfig,
}

impl SummaryClient {
    pub fn new(api_key: &str, config: SummaryConfig) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, config)
    }

    pub fn with_base_url(api_key: &str, base_url: &str, config: SummaryConfig) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    pub async fn summarize(
        &self,
        trend_titles: &[String],
        location_name: &str,
    ) -> TrendsResult<String> {
        let prompt = build_prompt(trend_titles, location_name);
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let res = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                TrendsError::SummarizationUnavailable(format!("completion request failed: {e}"))
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(TrendsError::SummarizationUnavailable(format!(
                "completion request returned {status}: {text}"
            )));
        }

        let resp: ChatCompletionResponse = res.json().await.map_err(|e| {
            TrendsError::SummarizationUnavailable(format!("completion response unreadable: {e}"))
        })?;

        let content = resp
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(TrendsError::SummarizationUnavailable(
                "no completion candidates returned".to_string(),
            ));
        }

        info!("Generated summary for {}", location_name);
        Ok(content)
    }
}

pub fn build_prompt(trend_titles: &[String], location_name: &str) -> String {
    format!(
        "Based on the following trending topics in {}, provide a brief analysis of what these \
         trends suggest about current interests and concerns in the area: {}",
        location_name,
        trend_titles.join(", ")
    )
}
