// src/api.rs
//! Thin HTTP surface over the cache: snapshot reads plus a manual refresh
//! trigger. The collector subsystem never depends on this layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::collect::cache::{NewsCache, NewsStore};
use crate::collect::scheduler::{RefreshOutcome, Scheduler};
use crate::collect::types::NewsItem;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<NewsStore>,
    pub scheduler: Scheduler,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/news", get(all_news))
        .route("/api/news/last-update", get(last_update))
        .route("/api/news/refresh", post(refresh))
        .route("/api/news/{category}", get(news_by_category))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResp {
    status: &'static str,
    news_collector: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct LastUpdateResp {
    last_update: Option<chrono::DateTime<chrono::Utc>>,
    needs_refresh: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResp {
    status: RefreshOutcome,
    last_update: Option<chrono::DateTime<chrono::Utc>>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    Json(HealthResp {
        status: "ok",
        news_collector: state.store.last_update().is_some(),
    })
}

async fn all_news(State(state): State<AppState>) -> Json<NewsCache> {
    Json(state.store.get_all())
}

async fn news_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<NewsItem>> {
    Json(state.store.get_by_category(&category))
}

async fn last_update(State(state): State<AppState>) -> Json<LastUpdateResp> {
    Json(LastUpdateResp {
        last_update: state.store.last_update(),
        needs_refresh: state.store.needs_refresh(),
    })
}

/// Runs a full cycle and returns once it completes; reports `already_running`
/// instead of piling a second cycle onto an in-flight one.
async fn refresh(State(state): State<AppState>) -> Json<RefreshResp> {
    let status = state.scheduler.refresh_now().await;
    Json(RefreshResp {
        status,
        last_update: state.store.last_update(),
    })
}
