use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    #[error("Summarization unavailable: {0}")]
    SummarizationUnavailable(String),
}

pub type TrendsResult<T> = Result<T, TrendsError>;
