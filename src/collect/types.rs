// src/collect/types.rs
use chrono::{DateTime, Utc};

use crate::error::FetchError;

/// Fixed content categories. Regional buckets carry `Regional` and an
/// additional region id inside the cache's sub-map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ai,
    Geopolitics,
    Github,
    Music,
    Regional,
}

/// Normalized external news/content record, common across all providers.
///
/// `id` + `source` identify the item within one fetch; no cross-run
/// deduplication happens, every cycle replaces the whole bucket.
/// Category-specific fields (star count, artist, region...) travel in the
/// flattened `extra` map so the serialized shape stays compatible with the
/// cache file the Node service wrote.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One upstream provider. Implementations must never let a transport or
/// parse failure escape as anything but `FetchError`.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError>;
    fn name(&self) -> &str;
}

/// Address of one bucket inside the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Ai,
    Geopolitics,
    Github,
    Music,
    Region(String),
}

impl BucketKey {
    pub fn as_str(&self) -> &str {
        match self {
            BucketKey::Ai => "ai",
            BucketKey::Geopolitics => "geopolitics",
            BucketKey::Github => "github",
            BucketKey::Music => "music",
            BucketKey::Region(r) => r.as_str(),
        }
    }
}
