// src/error.rs
use thiserror::Error;

/// Failure of a single upstream fetch. Always contained by the collector:
/// the affected bucket keeps its previous contents.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse failed: {0}")]
    Parse(String),

    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// Durable snapshot read/write failure. Load failures degrade to the empty
/// default cache; save failures are logged and the in-memory cache stays
/// authoritative.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
