use crate::auth::Claims;
use crate::database::models::{NewProperty, Property, UpdateProperty};
use crate::database::Repository;
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub async fn create_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewProperty>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    let owner_id = claims.owner_id()?;
    let property = repository
        .create_property(owner_id, &payload)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    info!("Created property {} for owner {}", property.id, owner_id);
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn list_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let properties = repository
        .list_properties(claims.owner_id()?)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(properties))
}

pub async fn get_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError> {
    let property = repository
        .find_property(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Property with ID {} not found", id)))?;

    Ok(Json(property))
}

pub async fn update_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProperty>,
) -> Result<Json<Property>, ApiError> {
    let property = repository
        .update_property(id, &payload)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Property with ID {} not found", id)))?;

    Ok(Json(property))
}

pub async fn delete_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repository
        .delete_property(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    if !deleted {
        return Err(ApiError::NotFound(format!(
            "Property with ID {} not found",
            id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
