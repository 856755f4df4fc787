// Jobtracker - job-board REST backend

pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
