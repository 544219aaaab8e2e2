use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::render::{self, format::escape_html};
use crate::services::cache::DatasetCache;
use crate::services::loader::Loader;
use crate::sources::base::SheetSource;
use crate::window::Period;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;

/// 每个请求共享的状态
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SheetSource + Send + Sync>,
    pub cache: Arc<DatasetCache>,
    pub loader: Arc<Loader>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(source: Arc<dyn SheetSource + Send + Sync>, config: Config) -> Self {
        Self {
            source,
            cache: Arc::new(DatasetCache::new()),
            loader: Arc::new(Loader::new(&config)),
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub symbol: Option<String>,
    pub period: Option<String>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::UnknownPeriod(_) => StatusCode::BAD_REQUEST,
            DashboardError::EmptyWindow { .. } => StatusCode::NOT_FOUND,
            e if e.is_lookup() => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Render failed: {}", self);
        }

        let body = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Error</title></head>\
             <body><h1>Stocks Dashboard</h1><p>{}</p><p><a href=\"/\">Back</a></p></body></html>",
            escape_html(&self.to_string())
        );
        (status, Html(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// 每次请求都重新计算窗口、指标和图表；数据集来自缓存
async fn dashboard_handler(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> std::result::Result<Html<String>, DashboardError> {
    let period = match params.period.as_deref() {
        Some(p) => p.parse::<Period>()?,
        None => state.config.default_period,
    };

    let dataset = state
        .cache
        .get_or_load(state.source.as_ref(), &state.loader)
        .await?;

    let html = render::render_dashboard(
        &dataset,
        &state.config,
        params.symbol.as_deref(),
        period,
        state.config.today(),
        true,
    )?;
    Ok(Html(html))
}

async fn refresh_handler(State(state): State<AppState>) -> Redirect {
    state.cache.invalidate(&state.source.source_id()).await;
    Redirect::to("/")
}

async fn health_handler() -> &'static str {
    "ok"
}

pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
