//! Rutas de la API
//!
//! Ensamblado del router completo: recursos bajo /api, health check,
//! CORS y trazas HTTP.

pub mod booking_routes;
pub mod car_routes;
pub mod user_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/users",
            user_routes::create_user_router(state.clone()),
        )
        .nest("/api/cars", car_routes::create_car_router(state.clone()))
        .nest(
            "/api/bookings",
            booking_routes::create_booking_router(state.clone()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Health check
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "car-rental",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
