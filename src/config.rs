// src/config.rs
//! Collector configuration: refresh interval, per-category caps, keyword
//! filters, and region definitions. Loaded from TOML with built-in defaults
//! matching the original deployment; filters are injected into fetchers at
//! construction instead of being hardcoded inline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const ENV_PATH: &str = "NEWS_COLLECTOR_CONFIG";
const DEFAULT_PATH: &str = "config/collector.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Period between aggregation cycles, in seconds.
    pub update_interval_secs: u64,
    /// Bounded timeout applied to every outbound call.
    pub request_timeout_secs: u64,
    /// Durable snapshot location.
    pub cache_path: PathBuf,
    /// Outbound client identifier; GitHub rejects anonymous clients.
    pub user_agent: String,
    pub caps: Caps,
    pub hacker_news: HackerNewsConfig,
    pub arxiv: ArxivConfig,
    pub github: GithubConfig,
    pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Caps {
    pub ai: usize,
    pub geopolitics: usize,
    pub github: usize,
    pub music: usize,
    pub regional: usize,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            ai: 20,
            geopolitics: 15,
            github: 15,
            music: 10,
            regional: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HackerNewsConfig {
    /// How many ids from the new-stories listing get a detail lookup.
    pub listing_limit: usize,
    /// Title must contain at least one of these (case-insensitive); the HN
    /// API has no topic filter of its own.
    pub keywords: Vec<String>,
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            listing_limit: 30,
            keywords: [
                "AI",
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "neural network",
                "GPT",
                "Claude",
                "ChatGPT",
                "LLM",
                "openai",
                "anthropic",
                "transformer",
                "diffusion",
                "stable diffusion",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivConfig {
    pub max_results: usize,
    /// OR-joined into the `all:` search query.
    pub keywords: Vec<String>,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            keywords: [
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "neural networks",
                "LLM",
                "GPT",
                "Claude",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub per_page: usize,
    pub min_stars: u64,
    /// Search window for "trending": repos created within the last N days.
    pub lookback_days: i64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            per_page: 20,
            min_stars: 100,
            lookback_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Cache key, e.g. "fujian".
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub cities: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 30 * 60,
            request_timeout_secs: 10,
            cache_path: PathBuf::from("data/news_cache.json"),
            user_agent: "Wisdom-Book-News-Collector".to_string(),
            caps: Caps::default(),
            hacker_news: HackerNewsConfig::default(),
            arxiv: ArxivConfig::default(),
            github: GithubConfig::default(),
            regions: vec![
                RegionConfig {
                    key: "fujian".into(),
                    display_name: "Fujian".into(),
                    cities: vec!["Fuzhou".into(), "Xiamen".into(), "Quanzhou".into()],
                },
                RegionConfig {
                    key: "innerMongolia".into(),
                    display_name: "Inner Mongolia".into(),
                    cities: vec!["Hohhot".into(), "Baotou".into(), "Ordos".into()],
                },
            ],
        }
    }
}

impl CollectorConfig {
    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load using `$NEWS_COLLECTOR_CONFIG`, then `config/collector.toml`,
    /// then built-in defaults. A present-but-broken file is an error; a
    /// missing file is not.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            return Self::load_from(&PathBuf::from(p));
        }
        let default = PathBuf::from(DEFAULT_PATH);
        if default.exists() {
            return Self::load_from(&default);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_deployment() {
        let cfg = CollectorConfig::default();
        assert_eq!(cfg.update_interval_secs, 1800);
        assert_eq!(cfg.caps.ai, 20);
        assert_eq!(cfg.regions.len(), 2);
        assert_eq!(cfg.regions[0].key, "fujian");
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("collector.toml");
        std::fs::write(&p, "update_interval_secs = 60\n[caps]\nai = 5\n").unwrap();
        let cfg = CollectorConfig::load_from(&p).unwrap();
        assert_eq!(cfg.update_interval_secs, 60);
        assert_eq!(cfg.caps.ai, 5);
        assert_eq!(cfg.caps.github, 15);
        assert_eq!(cfg.github.per_page, 20);
    }

    #[serial_test::serial]
    #[test]
    fn env_var_overrides_the_default_path() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("override.toml");
        std::fs::write(&p, "update_interval_secs = 90\n").unwrap();

        std::env::set_var(ENV_PATH, p.display().to_string());
        let cfg = CollectorConfig::load_default().unwrap();
        std::env::remove_var(ENV_PATH);

        assert_eq!(cfg.update_interval_secs, 90);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("collector.toml");
        std::fs::write(&p, "update_interval_secs = \"not a number").unwrap();
        let err = CollectorConfig::load_from(&p).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
