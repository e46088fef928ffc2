use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use property_api::auth::{self, JwtManager};
use property_api::config::Settings;
use property_api::database::{DbPool, Repository};
use property_api::handlers;
use property_api::services::{DashboardService, RentService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,property_api=debug".to_string()),
        )
        .with_target(true)
        .json()
        .init();

    info!("🚀 Starting Property API Server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    // Initialize database pool
    let db_pool = DbPool::new(&settings.database).await?;
    info!("✅ Database connection established");

    // Initialize repository
    let repository = Arc::new(Repository::new(db_pool.clone()));
    repository.ensure_schema().await?;
    info!("✅ Schema ensured");

    // Initialize services
    let rent_service = Arc::new(RentService::new(repository.clone()));
    let dashboard_service = Arc::new(DashboardService::new(repository.clone()));

    let jwt_manager = Arc::new(JwtManager::new(
        &settings.auth.jwt_secret,
        settings.auth.token_expiration_seconds,
    ));

    // Build router
    let app = build_router(
        repository,
        rent_service,
        dashboard_service,
        jwt_manager,
        db_pool,
    );

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(
    repository: Arc<Repository>,
    rent_service: Arc<RentService>,
    dashboard_service: Arc<DashboardService>,
    jwt_manager: Arc<JwtManager>,
    db_pool: DbPool,
) -> Router {
    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    // Protected routes (dengan auth middleware)
    let protected_routes = Router::new()
        // Dashboard
        .route(
            "/api/dashboard/property/{property_id}/summary",
            get(handlers::dashboard::summary_handler),
        )
        .route(
            "/api/dashboard/property/{property_id}/activity",
            get(handlers::dashboard::activity_handler),
        )
        .route(
            "/api/dashboard/property/{property_id}/financial",
            get(handlers::dashboard::financial_handler),
        )
        // Rent
        .route(
            "/api/rent",
            post(handlers::rent::create_handler).get(handlers::rent::list_handler),
        )
        .route(
            "/api/rent/{id}",
            get(handlers::rent::get_handler)
                .patch(handlers::rent::update_handler)
                .delete(handlers::rent::delete_handler),
        )
        .route("/api/rent/{id}/payment", post(handlers::rent::payment_handler))
        .route(
            "/api/rent/property/{property_id}/pending",
            get(handlers::rent::pending_handler),
        )
        .route(
            "/api/rent/property/{property_id}/stats",
            get(handlers::rent::stats_handler),
        )
        // Properties
        .route(
            "/api/properties",
            post(handlers::properties::create_handler).get(handlers::properties::list_handler),
        )
        .route(
            "/api/properties/{id}",
            get(handlers::properties::get_handler)
                .patch(handlers::properties::update_handler)
                .delete(handlers::properties::delete_handler),
        )
        // Rooms
        .route(
            "/api/rooms",
            post(handlers::rooms::create_handler).get(handlers::rooms::list_handler),
        )
        .route(
            "/api/rooms/{id}",
            get(handlers::rooms::get_handler)
                .patch(handlers::rooms::update_handler)
                .delete(handlers::rooms::delete_handler),
        )
        .route(
            "/api/rooms/property/{property_id}/stats",
            get(handlers::rooms::occupancy_handler),
        )
        // Tenants
        .route(
            "/api/tenants",
            post(handlers::tenants::create_handler).get(handlers::tenants::list_handler),
        )
        .route(
            "/api/tenants/{id}",
            get(handlers::tenants::get_handler)
                .patch(handlers::tenants::update_handler)
                .delete(handlers::tenants::delete_handler),
        )
        .route(
            "/api/tenants/{id}/check-in",
            post(handlers::tenants::check_in_handler),
        )
        .route(
            "/api/tenants/{id}/check-out",
            post(handlers::tenants::check_out_handler),
        )
        .layer(middleware::from_fn(auth::middleware::auth_middleware))
        .layer(Extension(jwt_manager));

    // Combine routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Shared state
        .layer(Extension(repository))
        .layer(Extension(rent_service))
        .layer(Extension(dashboard_service))
        .layer(Extension(db_pool))
        // CORS
        .layer(CorsLayer::permissive())
        // Tracing
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
