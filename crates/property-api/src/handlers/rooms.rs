use crate::database::models::{NewRoom, Room, RoomStatus, UpdateRoom};
use crate::database::Repository;
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Json(payload): Json<NewRoom>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = repository
        .create_room(&payload)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(room)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRoomsQuery {
    pub property_id: Option<Uuid>,
}

pub async fn list_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Query(query): Query<ListRoomsQuery>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let rooms = repository
        .list_rooms(query.property_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(rooms))
}

pub async fn get_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Room>, ApiError> {
    let room = repository
        .find_room(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Room with ID {} not found", id)))?;

    Ok(Json(room))
}

pub async fn update_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoom>,
) -> Result<Json<Room>, ApiError> {
    let room = repository
        .update_room(id, &payload)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Room with ID {} not found", id)))?;

    Ok(Json(room))
}

pub async fn delete_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repository
        .delete_room(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if !deleted {
        return Err(ApiError::NotFound(format!("Room with ID {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub total: i64,
    pub occupied: i64,
    pub vacant: i64,
    pub maintenance: i64,
    pub occupancy_rate: Decimal,
}

pub async fn occupancy_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<RoomOccupancy>, ApiError> {
    let (total, occupied, vacant, maintenance) = tokio::try_join!(
        repository.count_rooms(property_id, None),
        repository.count_rooms(property_id, Some(RoomStatus::Occupied)),
        repository.count_rooms(property_id, Some(RoomStatus::Vacant)),
        repository.count_rooms(property_id, Some(RoomStatus::Maintenance)),
    )
    .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let occupancy_rate = if total > 0 {
        (Decimal::from(occupied) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    Ok(Json(RoomOccupancy {
        total,
        occupied,
        vacant,
        maintenance,
        occupancy_rate,
    }))
}
