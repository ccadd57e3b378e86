// src/collect/providers/hacker_news.rs
//! Hacker News provider: new-stories listing followed by concurrent per-item
//! detail lookups. The API has no topic filter, so titles are matched against
//! the configured keyword list after the fact.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Deserialize;
use tokio::task::JoinSet;

use crate::collect::title_matches;
use crate::collect::types::{Category, NewsItem, NewsSource};
use crate::error::FetchError;

const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

#[derive(Debug, Deserialize)]
struct HnItem {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    time: Option<i64>,
}

pub struct HackerNewsSource {
    client: reqwest::Client,
    base_url: String,
    keywords: Vec<String>,
    listing_limit: usize,
}

impl HackerNewsSource {
    pub fn new(client: reqwest::Client, keywords: Vec<String>, listing_limit: usize) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            keywords,
            listing_limit,
        }
    }

    /// Point at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_story(
        client: reqwest::Client,
        base_url: String,
        id: u64,
    ) -> Result<HnItem, FetchError> {
        let item = client
            .get(format!("{base_url}/item/{id}.json"))
            .send()
            .await?
            .error_for_status()?
            .json::<HnItem>()
            .await?;
        Ok(item)
    }

    fn to_item(&self, story: HnItem) -> Option<NewsItem> {
        let title = story.title?;
        if !title_matches(&title, &self.keywords) {
            return None;
        }
        let url = story
            .url
            .unwrap_or_else(|| format!("https://news.ycombinator.com/item?id={}", story.id));
        let published_at = story
            .time
            .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
            .unwrap_or_else(Utc::now);
        Some(NewsItem {
            id: story.id.to_string(),
            title,
            url,
            source: "Hacker News".to_string(),
            published_at,
            category: Category::Ai,
            authors: None,
            extra: serde_json::Map::new(),
        })
    }
}

#[async_trait]
impl NewsSource for HackerNewsSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        let ids: Vec<u64> = self
            .client
            .get(format!("{}/newstories.json", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Detail lookups run concurrently; a failed lookup drops that story
        // only, never the batch. Slot by listing index to keep upstream order.
        let mut set = JoinSet::new();
        let ids: Vec<u64> = ids.into_iter().take(self.listing_limit).collect();
        for (idx, id) in ids.iter().copied().enumerate() {
            let client = self.client.clone();
            let base_url = self.base_url.clone();
            set.spawn(async move { (idx, Self::fetch_story(client, base_url, id).await) });
        }

        let mut slots: Vec<Option<NewsItem>> = vec![None; ids.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, Ok(story))) => slots[idx] = self.to_item(story),
                Ok((idx, Err(e))) => {
                    counter!("news_fetch_errors_total").increment(1);
                    tracing::debug!(error = ?e, id = ids[idx], "hn story lookup failed, skipping");
                }
                Err(e) => tracing::warn!(error = ?e, "hn story task failed"),
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    fn name(&self) -> &str {
        "Hacker News"
    }
}
