/// HTTP server setup and routing
use crate::{
    config::ObjectStoreConfig,
    context::AppContext,
    error::{DeskError, DeskResult},
};
use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let mut router = Router::new()
        // Health check endpoint (no middleware)
        .route("/health", get(health_check));

    // Serve stored media directly when the library sits on disk
    if let ObjectStoreConfig::Disk { location } = &ctx.config.storage.object_store {
        router = router.nest_service("/media", ServeDir::new(location));
    }

    router
        .merge(crate::api::routes())
        .with_state(ctx.clone())
        .layer(DefaultBodyLimit::max(ctx.config.service.upload_limit))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .fallback(not_found)
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "NotFound",
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> DeskResult<()> {
    let addr = format!("{}:{}", ctx.config.service.hostname, ctx.config.service.port);

    info!("Orbit Desk listening on {}", addr);
    info!("   Service URL: {}", ctx.service_url());
    info!("   Public URL:  {}", ctx.config.service.public_url);

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DeskError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| DeskError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
