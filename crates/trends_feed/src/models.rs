use serde::{Deserialize, Serialize};

/// A news-like item attached to a trend. All free-text fields are
/// entity-decoded by the normalizer before they land here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub image: String,
    pub source: String,
}

/// One normalized feed item. `related` is always a list, never a bare
/// object; downstream consumers rely on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    pub title: String,
    pub traffic: String,
    pub image: String,
    pub image_source: String,
    pub related: Vec<RelatedItem>,
}
