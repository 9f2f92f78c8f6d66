use crate::{health, state::AppState};
use crate::api::users::users::{
    change_password, get_profile, login, logout, refresh_access_token, register, update_details,
    usage_report,
};

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, patch, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origin);

    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Public account endpoints
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/users/login", post(login))
        // Refresh is public: the normal caller holds an expired access token
        .route("/api/v1/users/refresh-token", post(refresh_access_token))
        // Gated account endpoints
        .route("/api/v1/users/profile", get(get_profile))
        .route("/api/v1/users/update-details", patch(update_details))
        .route("/api/v1/users/change-password", patch(change_password))
        .route("/api/v1/users/logout", post(logout))
        // Admin endpoints
        .route("/api/v1/users/usage-report", get(usage_report))
        // Add shared state
        .with_state(state)
        .layer(cors)
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origin == "*" {
        return base.allow_origin(Any);
    }

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => base.allow_origin(origin),
        Err(e) => {
            log::warn!(
                "Invalid CORS origin '{}' ({}), falling back to any origin",
                allowed_origin,
                e
            );
            base.allow_origin(Any)
        }
    }
}
