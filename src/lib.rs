// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod collect;
pub mod config;
pub mod error;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::collect::cache::{NewsCache, NewsStore};
pub use crate::collect::scheduler::{RefreshOutcome, Scheduler};
pub use crate::collect::types::{BucketKey, Category, NewsItem, NewsSource};
pub use crate::collect::{CategoryPlan, Collector};
pub use crate::config::CollectorConfig;
pub use crate::error::{ConfigError, FetchError, PersistenceError};
