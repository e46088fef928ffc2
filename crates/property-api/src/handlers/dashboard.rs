use crate::services::dashboard_service::{
    ActivityEvent, DashboardResponse, MonthlyFinancial, DEFAULT_ACTIVITY_LIMIT,
};
use crate::services::DashboardService;
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub async fn summary_handler(
    Extension(dashboard): Extension<Arc<DashboardService>>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<DashboardResponse>, ApiError> {
    info!("Dashboard summary request for property {}", property_id);

    let response = dashboard.summary(property_id).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}

pub async fn activity_handler(
    Extension(dashboard): Extension<Arc<DashboardService>>,
    Path(property_id): Path<Uuid>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEvent>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    let events = dashboard.recent_activity(property_id, limit).await?;
    Ok(Json(events))
}

pub async fn financial_handler(
    Extension(dashboard): Extension<Arc<DashboardService>>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<Vec<MonthlyFinancial>>, ApiError> {
    let overview = dashboard.financial_overview(property_id).await?;
    Ok(Json(overview))
}
