// src/collect/mod.rs
//! The news collector: concurrent fan-out across source providers, per-bucket
//! failure isolation, and the durable cache refresh cycle.

pub mod cache;
pub mod providers;
pub mod scheduler;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::task::JoinSet;

use crate::collect::cache::NewsStore;
use crate::collect::providers::{
    ArxivSource, GithubTrendingSource, HackerNewsSource, PlaceholderFeed,
};
use crate::collect::types::{BucketKey, NewsItem, NewsSource};
use crate::config::CollectorConfig;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_cycle_runs_total", "Completed aggregation cycles.");
        describe_counter!("news_items_total", "Items written into cache buckets.");
        describe_counter!(
            "news_fetch_errors_total",
            "Provider fetch/parse errors (contained, bucket kept stale)."
        );
        describe_counter!(
            "news_buckets_stale_total",
            "Buckets left untouched because every source failed."
        );
        describe_gauge!("news_last_cycle_ts", "Unix ts when the last cycle finished.");
    });
}

/// Normalize a feed title: decode entities, drop tags, collapse whitespace.
pub fn normalize_title(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Case-insensitive "title mentions any keyword" check, used where the
/// upstream API has no native topic filter.
pub fn title_matches(title: &str, keywords: &[String]) -> bool {
    let lower = title.to_lowercase();
    keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
}

/// One cache bucket and the sources feeding it. Successful member results are
/// concatenated in declared order, then truncated to `cap`.
pub struct CategoryPlan {
    pub key: BucketKey,
    pub cap: usize,
    pub sources: Vec<Arc<dyn NewsSource>>,
}

/// Orchestrates one refresh cycle against the shared store. The collector is
/// the only writer; the store hands read-only snapshots to everyone else.
pub struct Collector {
    store: Arc<NewsStore>,
    plans: Vec<Arc<CategoryPlan>>,
}

impl Collector {
    pub fn new(store: Arc<NewsStore>, plans: Vec<CategoryPlan>) -> Self {
        Self {
            store,
            plans: plans.into_iter().map(Arc::new).collect(),
        }
    }

    /// Standard category wiring: AI from Hacker News + arXiv, GitHub trending,
    /// and placeholder feeds for geopolitics, music, and each region.
    pub fn from_config(store: Arc<NewsStore>, cfg: &CollectorConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("building http client")?;

        let mut plans = vec![
            CategoryPlan {
                key: BucketKey::Ai,
                cap: cfg.caps.ai,
                sources: vec![
                    Arc::new(HackerNewsSource::new(
                        client.clone(),
                        cfg.hacker_news.keywords.clone(),
                        cfg.hacker_news.listing_limit,
                    )),
                    Arc::new(ArxivSource::new(
                        client.clone(),
                        cfg.arxiv.keywords.clone(),
                        cfg.arxiv.max_results,
                    )),
                ],
            },
            CategoryPlan {
                key: BucketKey::Geopolitics,
                cap: cfg.caps.geopolitics,
                sources: vec![Arc::new(PlaceholderFeed::geopolitics())],
            },
            CategoryPlan {
                key: BucketKey::Github,
                cap: cfg.caps.github,
                sources: vec![Arc::new(GithubTrendingSource::new(
                    client.clone(),
                    cfg.github.per_page,
                    cfg.github.min_stars,
                    cfg.github.lookback_days,
                ))],
            },
            CategoryPlan {
                key: BucketKey::Music,
                cap: cfg.caps.music,
                sources: vec![Arc::new(PlaceholderFeed::music())],
            },
        ];
        for region in &cfg.regions {
            plans.push(CategoryPlan {
                key: BucketKey::Region(region.key.clone()),
                cap: cfg.caps.regional,
                sources: vec![Arc::new(PlaceholderFeed::regional(
                    &region.key,
                    &region.display_name,
                    &region.cities,
                ))],
            });
        }
        Ok(Self::new(store, plans))
    }

    pub fn store(&self) -> &Arc<NewsStore> {
        &self.store
    }

    /// One full refresh cycle. All category plans run concurrently; each
    /// bucket is replaced wholesale the moment its plan resolves with at
    /// least one successful source, and kept as-is otherwise. `lastUpdate`
    /// is stamped and the snapshot saved even when every plan failed.
    /// Nothing here returns or panics with an error.
    pub async fn run_cycle(&self) {
        ensure_metrics_described();
        let started = std::time::Instant::now();
        tracing::info!("news cycle starting");

        let mut set = JoinSet::new();
        for plan in &self.plans {
            let plan = plan.clone();
            set.spawn(async move {
                let merged = fetch_plan(&plan).await;
                (plan, merged)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((plan, Some(items))) => {
                    counter!("news_items_total").increment(items.len() as u64);
                    tracing::debug!(bucket = plan.key.as_str(), count = items.len(), "bucket updated");
                    self.store.set_bucket(&plan.key, items);
                }
                Ok((plan, None)) => {
                    counter!("news_buckets_stale_total").increment(1);
                    tracing::warn!(
                        bucket = plan.key.as_str(),
                        "every source failed, keeping previous bucket"
                    );
                }
                Err(e) => tracing::error!(error = ?e, "category task failed"),
            }
        }

        let now = Utc::now();
        self.store.stamp_last_update(now);
        if let Err(e) = self.store.save() {
            tracing::warn!(error = ?e, "cache save failed, in-memory cache stays authoritative");
        }

        counter!("news_cycle_runs_total").increment(1);
        gauge!("news_last_cycle_ts").set(now.timestamp().max(0) as f64);
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "news cycle complete"
        );
    }
}

/// Fetch every source of one plan concurrently. Successes are concatenated in
/// the plan's declared source order and truncated to the cap; `None` means
/// every source failed and the caller must keep the previous bucket.
pub(crate) async fn fetch_plan(plan: &CategoryPlan) -> Option<Vec<NewsItem>> {
    let mut set = JoinSet::new();
    for (idx, source) in plan.sources.iter().enumerate() {
        let source = source.clone();
        set.spawn(async move { (idx, source.fetch().await) });
    }

    let mut slots: Vec<Option<Vec<NewsItem>>> = vec![None; plan.sources.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, Ok(items))) => slots[idx] = Some(items),
            Ok((idx, Err(e))) => {
                counter!("news_fetch_errors_total").increment(1);
                tracing::warn!(
                    error = ?e,
                    provider = plan.sources[idx].name(),
                    bucket = plan.key.as_str(),
                    "provider error"
                );
            }
            Err(e) => tracing::error!(error = ?e, bucket = plan.key.as_str(), "source task failed"),
        }
    }

    if slots.iter().all(Option::is_none) {
        return None;
    }
    let mut merged: Vec<NewsItem> = slots.into_iter().flatten().flatten().collect();
    merged.truncate(plan.cap);
    Some(merged)
}
