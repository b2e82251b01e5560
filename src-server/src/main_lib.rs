use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sprintview_core::calendar::{HolidayCalendar, HolidayList, WorkingDayCalendar};
use sprintview_core::errors::Result as CoreResult;
use sprintview_core::forecast::ForecastService;
use sprintview_core::issues::{Issue, IssueSupplierTrait, JsonFileIssueSupplier};
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::api;
use crate::config::Config;

pub struct AppState {
    pub forecast_service: ForecastService,
    pub issue_supplier: Arc<dyn IssueSupplierTrait>,
    /// Latest successfully fetched snapshot, replaced wholesale on reload
    issues: RwLock<Arc<Vec<Issue>>>,
}

impl AppState {
    pub fn new(forecast_service: ForecastService, issue_supplier: Arc<dyn IssueSupplierTrait>) -> Self {
        AppState {
            forecast_service,
            issue_supplier,
            issues: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub async fn snapshot(&self) -> Arc<Vec<Issue>> {
        self.issues.read().await.clone()
    }

    /// Refetch from the supplier. On failure the previous snapshot stays.
    pub async fn reload(&self) -> CoreResult<usize> {
        let fetched = self.issue_supplier.fetch_issues().await?;
        let count = fetched.len();
        *self.issues.write().await = Arc::new(fetched);
        tracing::info!(count, source = %self.issue_supplier.describe(), "issue snapshot replaced");
        Ok(count)
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
}

/// Holiday table for the configured calendar kind, reading the table file
/// when one is set.
pub async fn holiday_calendar(config: &Config) -> anyhow::Result<Arc<dyn HolidayCalendar>> {
    let list = match &config.holidays_file {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading holiday table {}", path.display()))?;
            let list = HolidayList::parse_table(&raw)?;
            tracing::info!(path = %path.display(), holidays = list.len(), "holiday table loaded");
            Some(list)
        }
        None => None,
    };
    Ok(config.holidays.into_calendar(list)?)
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let calendar = WorkingDayCalendar::new(holiday_calendar(&config).await?);
    let forecast_service = ForecastService::new(calendar, config.forecast.clone());
    let supplier = JsonFileIssueSupplier::new(config.issues_file.clone(), config.issues_format);
    let state = Arc::new(AppState::new(forecast_service, Arc::new(supplier)));

    if let Err(e) = state.reload().await {
        tracing::warn!(error = %e, "initial issue load failed, starting with an empty snapshot");
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, holidays = ?config.holidays, "sprintview server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
