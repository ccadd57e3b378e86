//! News Collector Service — Binary Entrypoint
//! Boots the Axum HTTP server, wires the shared cache store, and spawns the
//! periodic collection scheduler.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wisdom_news_collector::api::{self, AppState};
use wisdom_news_collector::collect::Collector;
use wisdom_news_collector::metrics::Metrics;
use wisdom_news_collector::{CollectorConfig, NewsStore, Scheduler};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wisdom_news_collector=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = CollectorConfig::load_default()?;
    let metrics = Metrics::init(cfg.update_interval_secs);

    let store = Arc::new(NewsStore::open(&cfg));
    let collector = Arc::new(Collector::from_config(store.clone(), &cfg)?);
    let scheduler = Scheduler::new(collector);

    // Immediate startup cycle, then the fixed period. Handle kept implicitly;
    // the task dies with the process.
    let _job = scheduler.spawn(Duration::from_secs(cfg.update_interval_secs));

    let router = api::create_router(AppState { store, scheduler }).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "news collector listening");
    axum::serve(listener, router).await?;
    Ok(())
}
