// src/collect/providers/arxiv.rs
//! arXiv Atom provider. The feed is parsed structurally via quick-xml serde;
//! titles come back with embedded newlines and get normalized.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::collect::normalize_title;
use crate::collect::types::{Category, NewsItem, NewsSource};
use crate::error::FetchError;

const DEFAULT_BASE_URL: &str = "http://export.arxiv.org/api/query";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    title: String,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
}

pub struct ArxivSource {
    client: reqwest::Client,
    base_url: String,
    keywords: Vec<String>,
    max_results: usize,
}

impl ArxivSource {
    pub fn new(client: reqwest::Client, keywords: Vec<String>, max_results: usize) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            keywords,
            max_results,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn query_url(&self) -> String {
        let query = self.keywords.join(" OR ");
        format!(
            "{}?search_query=all:{}&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.base_url,
            urlencoding::encode(&query),
            self.max_results
        )
    }
}

fn parse_feed(xml: &str) -> Result<Vec<NewsItem>, FetchError> {
    let feed: Feed = from_str(xml).map_err(|e| FetchError::Parse(e.to_string()))?;
    let mut out = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        let title = normalize_title(&entry.title);
        if title.is_empty() {
            continue;
        }
        // the Atom id is the abstract permalink; its last segment is the
        // paper id, e.g. http://arxiv.org/abs/2506.01234v1 -> 2506.01234v1
        let id = entry
            .id
            .rsplit('/')
            .next()
            .unwrap_or(entry.id.as_str())
            .to_string();
        let published_at = entry
            .published
            .as_deref()
            .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let authors: Vec<String> = entry.authors.into_iter().map(|a| a.name).collect();
        out.push(NewsItem {
            id,
            title,
            url: entry.id,
            source: "arXiv".to_string(),
            published_at,
            category: Category::Ai,
            authors: (!authors.is_empty()).then_some(authors),
            extra: serde_json::Map::new(),
        });
    }
    Ok(out)
}

#[async_trait]
impl NewsSource for ArxivSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        let body = self
            .client
            .get(self.query_url())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_feed(&body)
    }

    fn name(&self) -> &str {
        "arXiv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2506.01234v1</id>
    <title>Scaling Laws for
  Sparse Mixture-of-Experts</title>
    <published>2025-06-01T17:59:00Z</published>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2506.05678v2</id>
    <title>Diffusion Models Revisited</title>
    <published>2025-06-02T03:12:45Z</published>
    <author><name>Grace Hopper</name></author>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_with_ids_authors_and_timestamps() {
        let items = parse_feed(FIXTURE).unwrap();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.id, "2506.01234v1");
        assert_eq!(first.title, "Scaling Laws for Sparse Mixture-of-Experts");
        assert_eq!(first.url, "http://arxiv.org/abs/2506.01234v1");
        assert_eq!(first.source, "arXiv");
        assert_eq!(
            first.authors.as_deref(),
            Some(&["Ada Lovelace".to_string(), "Alan Turing".to_string()][..])
        );
        assert_eq!(first.published_at.to_rfc3339(), "2025-06-01T17:59:00+00:00");
    }

    #[test]
    fn broken_xml_is_a_parse_error() {
        let err = parse_feed("<feed><entry></feed>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn query_url_encodes_the_or_joined_keywords() {
        let s = ArxivSource::new(
            reqwest::Client::new(),
            vec!["machine learning".into(), "LLM".into()],
            10,
        );
        let url = s.query_url();
        assert!(url.contains("search_query=all:machine%20learning%20OR%20LLM"));
        assert!(url.contains("max_results=10"));
        assert!(url.contains("sortBy=submittedDate"));
    }
}
