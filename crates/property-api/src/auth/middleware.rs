use crate::auth::JwtManager;
use crate::utils::error::ApiError;
use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Auth middleware - validate the bearer token and expose Claims to handlers
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    // Get shared state dari extensions
    let jwt_manager = request
        .extensions()
        .get::<Arc<JwtManager>>()
        .ok_or_else(|| ApiError::InternalError("JWT manager not configured".to_string()))?
        .clone();

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?
        .to_string();

    let claims = jwt_manager
        .validate_token(&token)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

    debug!("Authenticated request for subject {}", claims.sub);

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
