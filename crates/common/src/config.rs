use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub trends_feed_url: String,
    pub nominatim_url: String,
    pub bind_addr: String,
    pub summary: SummaryConfig,
    pub selection_cooldown_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = SummaryConfig::default();
        let summary = SummaryConfig {
            model: env::var("SUMMARY_MODEL").unwrap_or(defaults.model),
            max_tokens: env::var("SUMMARY_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: env::var("SUMMARY_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
        };

        Ok(Config {
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            trends_feed_url: env::var("TRENDS_FEED_URL")
                .unwrap_or_else(|_| "https://trends.google.com/trending/rss".to_string()),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            summary,
            selection_cooldown_secs: env::var("SELECTION_COOLDOWN_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
        })
    }

    pub fn require_openai_api_key(&self) -> Result<&String> {
        self.openai_api_key
            .as_ref()
            .context("OPENAI_API_KEY must be set")
    }
}
