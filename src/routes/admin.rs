use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{middleware, Extension, Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::db::DatabaseOperations;
use crate::middleware::auth::{authenticate, require_role, AuthUser};
use crate::models::{
    AppState, DashboardStats, UpdateApplicationStatusRequest, UpdateJobStatusRequest,
};
use crate::types::{
    ApiError, ApiResult, ApplicationStatus, JobStatus, JobType, Role, ValidatedJson,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/admin/jobs/{id}/status", patch(update_job_status))
        .route(
            "/api/v1/admin/applications/{id}",
            get(list_applications_for_job).patch(update_application_status),
        )
        .route("/api/v1/admin/dashboard", get(dashboard))
        .route("/api/v1/admin/seed", get(seed))
        .layer(middleware::from_fn(|req, next| {
            require_role(Role::Admin, req, next)
        }))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

async fn update_job_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateJobStatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let status = payload.status.parse::<JobStatus>()?;

    let job = DatabaseOperations::update_job_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    info!(job_id = %id, status = %status, "job status updated");

    Ok(Json(serde_json::json!({
        "message": "Job status updated",
        "job": job,
    })))
}

async fn list_applications_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let applications = DatabaseOperations::list_applications_for_job(&state.pool, job_id).await?;

    Ok(Json(serde_json::json!({ "applications": applications })))
}

async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateApplicationStatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    // Only a decision is accepted here; applications start as PENDING and
    // never go back.
    let status = payload.status.parse::<ApplicationStatus>()?;
    if status == ApplicationStatus::Pending {
        return Err(ApiError::validation("Invalid status"));
    }

    let application = DatabaseOperations::update_application_status(&state.pool, id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    info!(application_id = %id, status = %status, "application status updated");

    Ok(Json(serde_json::json!({ "application": application })))
}

async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let total_jobs = DatabaseOperations::count_jobs(&state.pool).await?;
    let total_users = DatabaseOperations::count_users(&state.pool).await?;
    let total_applications = DatabaseOperations::count_applications(&state.pool).await?;
    let application_stats = DatabaseOperations::application_status_counts(&state.pool).await?;
    let top_jobs = DatabaseOperations::top_jobs_by_applications(&state.pool, 5).await?;

    Ok(Json(DashboardStats {
        total_jobs,
        total_users,
        total_applications,
        application_stats,
        top_jobs,
    }))
}

const SEED_JOBS: &[(&str, &str, &str, i64, JobType)] = &[
    (
        "Registered Nurse",
        "Provide patient care and assist doctors in procedures.",
        "Bharatpur, Nepal",
        40_000,
        JobType::Other,
    ),
    (
        "Mechanical Engineer",
        "Design and develop mechanical systems and components.",
        "Pune, India",
        60_000,
        JobType::Engineering,
    ),
    (
        "Software Developer",
        "Develop web applications using modern frameworks.",
        "San Francisco, USA",
        90_000,
        JobType::Engineering,
    ),
    (
        "IT Support Specialist",
        "Provide technical assistance to clients and employees.",
        "Bangalore, India",
        50_000,
        JobType::Other,
    ),
    (
        "Graphic Designer",
        "Design creatives for digital and print media.",
        "London, UK",
        35_000,
        JobType::Design,
    ),
    (
        "Digital Marketing Manager",
        "Lead SEO, SEM, and social media campaigns.",
        "Mumbai, India",
        65_000,
        JobType::Marketing,
    ),
    (
        "Civil Engineer",
        "Manage and oversee construction projects.",
        "New Delhi, India",
        70_000,
        JobType::Engineering,
    ),
    (
        "AI Research Intern",
        "Assist in machine learning and LLM projects.",
        "Kathmandu, Nepal",
        30_000,
        JobType::Other,
    ),
    (
        "Content Writer",
        "Create engaging blog and website content.",
        "New York, USA",
        45_000,
        JobType::Other,
    ),
    (
        "Frontend Developer",
        "Build pixel-perfect UIs using modern frameworks.",
        "Chennai, India",
        55_000,
        JobType::Engineering,
    ),
];

/// Development convenience: populate the board with sample jobs posted by
/// the calling admin.
async fn seed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<serde_json::Value>> {
    for (title, description, location, salary, job_type) in SEED_JOBS {
        DatabaseOperations::create_job(
            &state.pool,
            title,
            description,
            location,
            Some(*salary),
            *job_type,
            user.id,
        )
        .await?;
    }

    info!(count = SEED_JOBS.len(), posted_by = %user.id, "seeded sample jobs");

    Ok(Json(serde_json::json!({
        "message": "Sample jobs created",
    })))
}
