pub mod fetcher;
pub mod models;
pub mod normalizer;

pub use fetcher::FeedFetcher;
pub use models::{RelatedItem, TrendRecord};
pub use normalizer::{decode_entities, normalize, normalize_feed, parse_document};
