//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/v1/auth` - Signup and signin
//! - `/api/v1/jobs` - Job listing and CRUD
//! - `/api/v1/applications` - Applying and the caller's applications
//! - `/api/v1/admin` - Job status, application review, dashboard, seed data
//! - `/api/health` - Health checks

pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;

use crate::middleware::cors::apply_cors;
use crate::models::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors_allowed_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(auth::router(state.clone()))
        .merge(jobs::router(state.clone()))
        .merge(applications::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(health::router(state));

    apply_cors(
        api_router.layer(TraceLayer::new_for_http()),
        &cors_allowed_origins,
    )
}
