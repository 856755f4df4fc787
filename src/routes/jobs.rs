use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{middleware, Extension, Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::db::{DatabaseOperations, JobFilters};
use crate::middleware::auth::{authenticate, require_role, AuthUser};
use crate::models::{AppState, CreateJobRequest, ListJobsQuery, UpdateJobRequest};
use crate::types::{ApiError, ApiResult, JobStatus, JobType, Role, ValidatedJson};

pub fn router(state: AppState) -> Router {
    let public = Router::new().route("/api/v1/jobs", get(list_jobs));

    let authenticated = Router::new()
        .route("/api/v1/jobs/{id}", get(get_job))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let admin = Router::new()
        .route("/api/v1/jobs", post(create_job))
        .route("/api/v1/jobs/{id}", put(update_job).delete(delete_job))
        .layer(middleware::from_fn(|req, next| {
            require_role(Role::Admin, req, next)
        }))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public.merge(authenticated).merge(admin).with_state(state)
}

async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let job_type = params
        .job_type
        .as_deref()
        .map(str::parse::<JobType>)
        .transpose()?;

    let filters = JobFilters {
        location: params.location,
        job_type,
        min_salary: params.min_salary,
        max_salary: params.max_salary,
        search: params.search,
    };

    let jobs = DatabaseOperations::list_open_jobs(&state.pool, &filters).await?;

    Ok(Json(serde_json::json!({ "jobs": jobs })))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let job = DatabaseOperations::get_job_with_poster(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(serde_json::json!({ "job": job })))
}

async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateJobRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let job_type = payload.job_type.parse::<JobType>()?;

    let job = DatabaseOperations::create_job(
        &state.pool,
        &payload.title,
        &payload.description,
        &payload.location,
        payload.salary,
        job_type,
        user.id,
    )
    .await?;

    info!(job_id = %job.id, posted_by = %user.id, "job created");

    Ok(Json(serde_json::json!({
        "message": "Job created successfully",
        "job": job,
    })))
}

async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateJobRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let job = DatabaseOperations::get_job(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.posted_by != user.id {
        return Err(ApiError::forbidden(
            "Forbidden: You can only update your own jobs",
        ));
    }

    // Partial update: absent fields keep their stored values.
    let job_type = match payload.job_type.as_deref() {
        Some(value) => value.parse::<JobType>()?,
        None => job.job_type,
    };
    let status = match payload.status.as_deref() {
        Some(value) => value.parse::<JobStatus>()?,
        None => job.status,
    };

    let updated = DatabaseOperations::update_job(
        &state.pool,
        id,
        payload.title.as_deref().unwrap_or(&job.title),
        payload.description.as_deref().unwrap_or(&job.description),
        payload.location.as_deref().unwrap_or(&job.location),
        payload.salary.or(job.salary),
        job_type,
        status,
    )
    .await?;

    info!(job_id = %id, "job updated");

    Ok(Json(serde_json::json!({
        "message": "Job updated",
        "job": updated,
    })))
}

async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let job = DatabaseOperations::get_job(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.posted_by != user.id {
        return Err(ApiError::forbidden(
            "Forbidden: You can only delete your own jobs",
        ));
    }

    DatabaseOperations::delete_job(&state.pool, id).await?;

    info!(job_id = %id, "job deleted");

    Ok(Json(serde_json::json!({ "message": "Job deleted successfully" })))
}
