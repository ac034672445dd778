use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Staffboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Role-gated internal dashboard: announcements and user roles",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "auth": "/auth/login",
            "session": "/session",
            "announcements": "/announcements",
            "users": "/users",
            "dashboard": "/dashboard"
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = sqlx::query("SELECT 1")
        .execute(&state.service_context.db_pool)
        .await;

    match database {
        Ok(_) => (StatusCode::OK, Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
                "status": "unavailable",
                "timestamp": chrono::Utc::now().to_rfc3339()
            })))
        }
    }
}
