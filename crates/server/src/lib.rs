//! SeaTrack server
//!
//! Presentation shell and write path: the landing page, the location
//! submission UI, the record write endpoint, and the admin-gated QR issuance
//! pages.

pub mod config;
pub mod handlers;
pub mod pages;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use handlers::AppState;
pub use session::{
    AdminGate, LoginOutcome, MemorySessionRepository, SessionRepository, DEFAULT_ADMIN_PASSWORD,
    SESSION_COOKIE,
};

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/", get(handlers::home_handler))
        .route("/log_location", get(handlers::log_location_page_handler))
        .route("/api/locations", post(handlers::log_location_handler))
        .route(
            "/admin/generate-qr",
            get(handlers::admin_qr_page_handler).post(handlers::admin_generate_handler),
        )
        .route(
            "/admin/generate-qr/qr.png",
            get(handlers::admin_qr_png_handler),
        )
        .route("/admin/login", post(handlers::admin_login_handler))
        .with_state(shared_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
