pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))

        // Everything below requires a session
        .merge(protected_routes(app_state.clone()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/session", get(handlers::session::current))
        .route("/session/capabilities", get(handlers::session::capabilities))
        .route("/dashboard", get(handlers::dashboard::summary))
        .route(
            "/announcements",
            get(handlers::announcements::list).post(handlers::announcements::create),
        )
        .route("/announcements/:id", patch(handlers::announcements::set_pinned))
        .route("/users", get(handlers::users::list))
        .route("/users/:id", patch(handlers::users::update_role))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
