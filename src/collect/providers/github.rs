// src/collect/providers/github.rs
//! GitHub "trending" provider. GitHub has no official trending API, so this
//! searches for repositories created in the last week above a star floor,
//! sorted by stars.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Map};

use crate::collect::types::{Category, NewsItem, NewsSource};
use crate::error::FetchError;

const DEFAULT_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repo>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    id: u64,
    full_name: String,
    html_url: String,
    description: Option<String>,
    stargazers_count: u64,
    language: Option<String>,
    created_at: DateTime<Utc>,
}

pub struct GithubTrendingSource {
    client: reqwest::Client,
    base_url: String,
    per_page: usize,
    min_stars: u64,
    lookback_days: i64,
}

impl GithubTrendingSource {
    pub fn new(client: reqwest::Client, per_page: usize, min_stars: u64, lookback_days: i64) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page,
            min_stars,
            lookback_days,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_url(&self, now: DateTime<Utc>) -> String {
        let since = (now - Duration::days(self.lookback_days)).format("%Y-%m-%d");
        let query = format!("created:>{since} stars:>{}", self.min_stars);
        format!(
            "{}/search/repositories?q={}&sort=stars&order=desc&per_page={}",
            self.base_url,
            urlencoding::encode(&query),
            self.per_page
        )
    }
}

fn to_items(resp: SearchResponse) -> Vec<NewsItem> {
    resp.items
        .into_iter()
        .map(|repo| {
            let mut extra = Map::new();
            extra.insert("stars".into(), json!(repo.stargazers_count));
            if let Some(lang) = repo.language {
                extra.insert("language".into(), json!(lang));
            }
            if let Some(desc) = repo.description {
                extra.insert("description".into(), json!(desc));
            }
            NewsItem {
                id: repo.id.to_string(),
                title: repo.full_name,
                url: repo.html_url,
                source: "GitHub".to_string(),
                published_at: repo.created_at,
                category: Category::Github,
                authors: None,
                extra,
            }
        })
        .collect()
}

#[async_trait]
impl NewsSource for GithubTrendingSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        let resp = self
            .client
            .get(self.search_url(Utc::now()))
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;
        Ok(to_items(resp))
    }

    fn name(&self) -> &str {
        "GitHub"
    }
}
