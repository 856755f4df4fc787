use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::db::{is_unique_violation, DatabaseOperations};
use crate::middleware::auth::{authenticate, require_role, AuthUser};
use crate::models::AppState;
use crate::types::{ApiError, ApiResult, Role};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/applications/{job_id}", post(apply))
        .route("/api/v1/applications/me", get(list_mine))
        .layer(middleware::from_fn(|req, next| {
            require_role(Role::User, req, next)
        }))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    DatabaseOperations::get_job(&state.pool, job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    // The unique index on (applicant_id, job_id) catches duplicates.
    let application =
        match DatabaseOperations::create_application(&state.pool, user.id, job_id).await {
            Ok(application) => application,
            Err(err) if is_unique_violation(&err) => {
                return Err(ApiError::conflict("Already applied"));
            }
            Err(err) => return Err(err.into()),
        };

    info!(application_id = %application.id, job_id = %job_id, "application submitted");

    Ok(Json(serde_json::json!({
        "message": "Applied successfully",
        "application": application,
    })))
}

async fn list_mine(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<serde_json::Value>> {
    let applications =
        DatabaseOperations::list_applications_for_user(&state.pool, user.id).await?;

    Ok(Json(serde_json::json!({ "applications": applications })))
}
