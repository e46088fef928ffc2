use crate::database::models::{NewTenant, Tenant, UpdateTenant};
use crate::database::Repository;
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub async fn create_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Json(payload): Json<NewTenant>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    let tenant = repository
        .create_tenant(&payload)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    info!("Created tenant {} ({})", tenant.id, tenant.email);
    Ok((StatusCode::CREATED, Json(tenant)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsQuery {
    pub property_id: Option<Uuid>,
}

pub async fn list_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Query(query): Query<ListTenantsQuery>,
) -> Result<Json<Vec<Tenant>>, ApiError> {
    let tenants = repository
        .list_tenants(query.property_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(tenants))
}

pub async fn get_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = repository
        .find_tenant(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Tenant with ID {} not found", id)))?;

    Ok(Json(tenant))
}

pub async fn update_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTenant>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = repository
        .update_tenant(id, &payload)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Tenant with ID {} not found", id)))?;

    Ok(Json(tenant))
}

pub async fn delete_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repository
        .delete_tenant(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if !deleted {
        return Err(ApiError::NotFound(format!(
            "Tenant with ID {} not found",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub check_in_date: Option<DateTime<Utc>>,
}

pub async fn check_in_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = repository
        .set_tenant_check_in(id, payload.check_in_date.unwrap_or_else(Utc::now))
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Tenant with ID {} not found", id)))?;

    Ok(Json(tenant))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutRequest {
    pub check_out_date: Option<DateTime<Utc>>,
}

pub async fn check_out_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckOutRequest>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = repository
        .set_tenant_check_out(id, payload.check_out_date.unwrap_or_else(Utc::now))
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Tenant with ID {} not found", id)))?;

    Ok(Json(tenant))
}
