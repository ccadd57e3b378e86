// src/collect/providers/stub.rs
//! Placeholder feeds for categories without a wired upstream (geopolitics,
//! regional press, music releases). They return a single sample entry so the
//! cache shape and the HTTP surface stay exercised end to end until a real
//! provider lands.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map};

use crate::collect::types::{Category, NewsItem, NewsSource};
use crate::error::FetchError;

pub struct PlaceholderFeed {
    source: String,
    category: Category,
    id_prefix: String,
    title: String,
    url: String,
    extra: Map<String, serde_json::Value>,
}

impl PlaceholderFeed {
    pub fn geopolitics() -> Self {
        Self {
            source: "World desk".to_string(),
            category: Category::Geopolitics,
            id_prefix: "geo".to_string(),
            title: "World affairs briefing".to_string(),
            url: "https://example.com/world".to_string(),
            extra: Map::new(),
        }
    }

    pub fn music() -> Self {
        let mut extra = Map::new();
        extra.insert("artist".into(), json!("Various artists"));
        Self {
            source: "Music desk".to_string(),
            category: Category::Music,
            id_prefix: "music".to_string(),
            title: "New releases this week".to_string(),
            url: "https://example.com/music".to_string(),
            extra,
        }
    }

    pub fn regional(key: &str, display_name: &str, cities: &[String]) -> Self {
        let mut extra = Map::new();
        extra.insert("region".into(), json!(key));
        if !cities.is_empty() {
            extra.insert("cities".into(), json!(cities));
        }
        Self {
            source: "Regional press".to_string(),
            category: Category::Regional,
            id_prefix: key.to_string(),
            title: format!("{display_name} development briefing"),
            url: "https://example.com/regional".to_string(),
            extra,
        }
    }
}

#[async_trait]
impl NewsSource for PlaceholderFeed {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        Ok(vec![NewsItem {
            id: format!("{}_1", self.id_prefix),
            title: self.title.clone(),
            url: self.url.clone(),
            source: self.source.clone(),
            published_at: Utc::now(),
            category: self.category,
            authors: None,
            extra: self.extra.clone(),
        }])
    }

    fn name(&self) -> &str {
        &self.source
    }
}
