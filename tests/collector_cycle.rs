//! Cycle-level properties: partial-failure isolation, cap enforcement, and
//! the lastUpdate/save contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use wisdom_news_collector::error::FetchError;
use wisdom_news_collector::{
    BucketKey, Category, CategoryPlan, Collector, CollectorConfig, NewsItem, NewsSource, NewsStore,
};

fn item(id: &str) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        title: format!("story {id}"),
        url: format!("https://example.com/{id}"),
        source: "Test".to_string(),
        published_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        category: Category::Ai,
        authors: None,
        extra: serde_json::Map::new(),
    }
}

fn items(prefix: &str, n: usize) -> Vec<NewsItem> {
    (0..n).map(|i| item(&format!("{prefix}{i}"))).collect()
}

struct FixedSource(Vec<NewsItem>);

#[async_trait::async_trait]
impl NewsSource for FixedSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &str {
        "fixed"
    }
}

/// Succeeds until `broken` flips, then fails every fetch.
struct BreakableSource {
    items: Vec<NewsItem>,
    broken: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl NewsSource for BreakableSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>, FetchError> {
        if self.broken.load(Ordering::SeqCst) {
            Err(FetchError::Malformed("upstream outage".into()))
        } else {
            Ok(self.items.clone())
        }
    }
    fn name(&self) -> &str {
        "breakable"
    }
}

fn store_in(dir: &std::path::Path) -> (Arc<NewsStore>, CollectorConfig) {
    let cfg = CollectorConfig {
        cache_path: dir.join("news_cache.json"),
        ..CollectorConfig::default()
    };
    (Arc::new(NewsStore::open(&cfg)), cfg)
}

#[tokio::test]
async fn failed_category_keeps_its_previous_bucket() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, _cfg) = store_in(tmp.path());
    let broken = Arc::new(AtomicBool::new(false));

    let collector = Collector::new(
        store.clone(),
        vec![
            CategoryPlan {
                key: BucketKey::Ai,
                cap: 20,
                sources: vec![Arc::new(BreakableSource {
                    items: items("ai", 3),
                    broken: broken.clone(),
                })],
            },
            CategoryPlan {
                key: BucketKey::Music,
                cap: 10,
                sources: vec![Arc::new(FixedSource(items("m", 2)))],
            },
        ],
    );

    collector.run_cycle().await;
    let before = store.get_by_category("ai");
    assert_eq!(before.len(), 3);

    // outage: the AI bucket must survive untouched, music still refreshes
    broken.store(true, Ordering::SeqCst);
    collector.run_cycle().await;
    assert_eq!(store.get_by_category("ai"), before);
    assert_eq!(store.get_by_category("music").len(), 2);
}

#[tokio::test]
async fn last_update_advances_even_when_every_source_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, _cfg) = store_in(tmp.path());
    let broken = Arc::new(AtomicBool::new(true));

    let collector = Collector::new(
        store.clone(),
        vec![CategoryPlan {
            key: BucketKey::Geopolitics,
            cap: 15,
            sources: vec![Arc::new(BreakableSource {
                items: vec![],
                broken,
            })],
        }],
    );

    assert!(store.last_update().is_none());
    collector.run_cycle().await;
    let first = store.last_update().expect("stamped despite total failure");
    assert!(store.get_by_category("geopolitics").is_empty());

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    collector.run_cycle().await;
    let second = store.last_update().unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn merged_bucket_is_capped_and_ordered() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, _cfg) = store_in(tmp.path());

    let collector = Collector::new(
        store.clone(),
        vec![CategoryPlan {
            key: BucketKey::Ai,
            cap: 20,
            sources: vec![
                Arc::new(FixedSource(items("hn", 15))),
                Arc::new(FixedSource(items("arxiv", 8))),
            ],
        }],
    );
    collector.run_cycle().await;

    let bucket = store.get_by_category("ai");
    assert_eq!(bucket.len(), 20);
    assert_eq!(bucket[0].id, "hn0");
    assert_eq!(bucket[15].id, "arxiv0");
}

#[tokio::test]
async fn cycle_persists_a_snapshot_a_fresh_store_can_load() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, cfg) = store_in(tmp.path());

    let collector = Collector::new(
        store.clone(),
        vec![CategoryPlan {
            key: BucketKey::Region("fujian".into()),
            cap: 10,
            sources: vec![Arc::new(FixedSource(items("fj", 4)))],
        }],
    );
    collector.run_cycle().await;

    let reloaded = NewsStore::open(&cfg);
    assert_eq!(reloaded.get_by_category("fujian").len(), 4);
    assert_eq!(reloaded.last_update(), store.last_update());
    assert!(!reloaded.needs_refresh());
}
