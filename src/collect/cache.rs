// src/collect/cache.rs
//! Durable news cache: one capped bucket per category, a regional sub-map,
//! and the timestamp of the last completed cycle. The serialized shape is
//! camelCase so a snapshot written by the original Node service loads as-is.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collect::types::{BucketKey, NewsItem};
use crate::config::CollectorConfig;
use crate::error::PersistenceError;

/// The aggregate root. Every field defaults independently so a partial or
/// older snapshot still loads field-by-field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsCache {
    pub ai_news: Vec<NewsItem>,
    pub geopolitics: Vec<NewsItem>,
    pub github_trending: Vec<NewsItem>,
    pub music: Vec<NewsItem>,
    pub regional_news: BTreeMap<String, Vec<NewsItem>>,
    pub last_update: Option<DateTime<Utc>>,
}

/// Owner of the single mutable cache. The collector writes buckets through
/// `set_bucket`; everything else reads cloned snapshots, so a reader can
/// never observe a partially-updated bucket or mutate the live cache.
#[derive(Debug)]
pub struct NewsStore {
    cache: RwLock<NewsCache>,
    path: PathBuf,
    refresh_interval: Duration,
}

impl NewsStore {
    /// Open the store: load the prior snapshot if one exists, otherwise start
    /// empty. A missing or corrupted file is handled identically and is never
    /// fatal. Buckets for configured regions are seeded empty.
    pub fn open(cfg: &CollectorConfig) -> Self {
        if let Some(dir) = cfg.cache_path.parent() {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!(error = ?e, dir = %dir.display(), "creating data directory failed");
            }
        }
        let mut cache = load_snapshot(&cfg.cache_path);
        for region in &cfg.regions {
            cache.regional_news.entry(region.key.clone()).or_default();
        }
        Self {
            cache: RwLock::new(cache),
            path: cfg.cache_path.clone(),
            refresh_interval: Duration::from_secs(cfg.update_interval_secs),
        }
    }

    /// Full snapshot by value.
    pub fn get_all(&self) -> NewsCache {
        self.cache.read().expect("cache rwlock poisoned").clone()
    }

    /// Bucket for a category key ("ai", "geopolitics", "github", "music", or
    /// a region id). Unknown keys yield an empty list, never an error.
    pub fn get_by_category(&self, key: &str) -> Vec<NewsItem> {
        let cache = self.cache.read().expect("cache rwlock poisoned");
        match key {
            "ai" => cache.ai_news.clone(),
            "geopolitics" => cache.geopolitics.clone(),
            "github" => cache.github_trending.clone(),
            "music" => cache.music.clone(),
            other => cache.regional_news.get(other).cloned().unwrap_or_default(),
        }
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.cache.read().expect("cache rwlock poisoned").last_update
    }

    /// Advisory: true when no cycle has ever completed or the last one is
    /// older than the refresh interval. Does not itself trigger anything.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh_at(Utc::now())
    }

    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_update() {
            None => true,
            Some(last) => {
                let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
                elapsed > self.refresh_interval
            }
        }
    }

    /// Whole-bucket replacement; collector-only.
    pub fn set_bucket(&self, key: &BucketKey, items: Vec<NewsItem>) {
        let mut cache = self.cache.write().expect("cache rwlock poisoned");
        match key {
            BucketKey::Ai => cache.ai_news = items,
            BucketKey::Geopolitics => cache.geopolitics = items,
            BucketKey::Github => cache.github_trending = items,
            BucketKey::Music => cache.music = items,
            BucketKey::Region(r) => {
                cache.regional_news.insert(r.clone(), items);
            }
        }
    }

    /// Stamped once per cycle, after every category resolved.
    pub fn stamp_last_update(&self, now: DateTime<Utc>) {
        self.cache.write().expect("cache rwlock poisoned").last_update = Some(now);
    }

    /// Persist the full cache. Written to a temp file and renamed into place
    /// so the previous snapshot stays intact if the write dies halfway.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let bytes = {
            let cache = self.cache.read().expect("cache rwlock poisoned");
            serde_json::to_vec_pretty(&*cache)?
        };
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn load_snapshot(path: &Path) -> NewsCache {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<NewsCache>(&content) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(error = ?e, path = %path.display(), "cache snapshot malformed, starting empty");
                NewsCache::default()
            }
        },
        Err(_) => {
            tracing::info!(path = %path.display(), "no cache snapshot, starting empty");
            NewsCache::default()
        }
    }
}
