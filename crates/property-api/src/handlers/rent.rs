use crate::database::models::{NewRent, Rent, RentDetail, UpdateRent};
use crate::services::rent_service::RentStats;
use crate::services::RentService;
use crate::utils::error::ApiError;
use crate::utils::pagination::{PaginatedResponse, Pagination};
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub async fn create_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Json(payload): Json<NewRent>,
) -> Result<(StatusCode, Json<Rent>), ApiError> {
    let rent = rent_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(rent)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRentsQuery {
    pub property_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Query(query): Query<ListRentsQuery>,
) -> Result<Json<PaginatedResponse<Rent>>, ApiError> {
    let pagination = Pagination::new(query.page, query.limit);
    let rents = rent_service.list(query.property_id, pagination).await?;
    Ok(Json(rents))
}

pub async fn get_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RentDetail>, ApiError> {
    let rent = rent_service.get(id).await?;
    Ok(Json(rent))
}

pub async fn update_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRent>,
) -> Result<Json<Rent>, ApiError> {
    let rent = rent_service.update(id, &payload).await?;
    Ok(Json(rent))
}

pub async fn delete_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    rent_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub amount_paid: Decimal,
    pub payment_method: String,
    pub transaction_id: Option<String>,
}

pub async fn payment_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<Json<RentDetail>, ApiError> {
    info!(
        "Payment of {} via {} against rent {}",
        payload.amount_paid, payload.payment_method, id
    );

    let rent = rent_service
        .record_payment(
            id,
            payload.amount_paid,
            &payload.payment_method,
            payload.transaction_id,
        )
        .await?;

    Ok(Json(rent))
}

pub async fn pending_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<Vec<Rent>>, ApiError> {
    let rents = rent_service.pending(property_id).await?;
    Ok(Json(rents))
}

pub async fn stats_handler(
    Extension(rent_service): Extension<Arc<RentService>>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<RentStats>, ApiError> {
    let stats = rent_service.stats(property_id).await?;
    Ok(Json(stats))
}
