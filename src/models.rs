use crate::config::Config;
use crate::types::{ApplicationStatus, JobStatus, JobType, Role};
use sqlx::PgPool;
use validator::{Validate, ValidationError};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

// Core entities
// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: uuid::Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: Option<i64>,
    pub job_type: JobType,
    pub status: JobStatus,
    pub posted_by: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: uuid::Uuid,
    pub applicant_id: uuid::Uuid,
    pub job_id: uuid::Uuid,
    pub status: ApplicationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// Join projections

/// Job row with its poster's email and role joined in.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct JobWithPoster {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub posted_by_email: String,
    pub posted_by_role: Role,
}

/// Application row as seen by the applicant, with job fields aliased in.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ApplicationWithJob {
    pub id: uuid::Uuid,
    pub job_id: uuid::Uuid,
    pub status: ApplicationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub job_title: String,
    pub job_location: String,
    pub job_type: JobType,
    pub job_status: JobStatus,
    pub job_salary: Option<i64>,
}

/// Application row as seen by an admin reviewing a job's applicants.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ApplicationWithApplicant {
    pub id: uuid::Uuid,
    pub job_id: uuid::Uuid,
    pub status: ApplicationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub applicant_id: uuid::Uuid,
    pub applicant_email: String,
    pub job_title: String,
}

// API request types

#[derive(Debug, serde::Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Defaults to USER when absent; parsed against the closed role enum.
    pub role: Option<String>,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(range(min = 1, message = "Salary must be a positive number"))]
    pub salary: Option<i64>,
    #[serde(rename = "type")]
    #[validate(custom(function = validate_job_type))]
    pub job_type: String,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Salary must be a positive number"))]
    pub salary: Option<i64>,
    #[serde(rename = "type")]
    #[validate(custom(function = validate_job_type))]
    pub job_type: Option<String>,
    #[validate(custom(function = validate_job_status))]
    pub status: Option<String>,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct UpdateJobStatusRequest {
    pub status: String,
}

#[derive(Debug, serde::Deserialize, Validate)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ListJobsQuery {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(rename = "minSalary")]
    pub min_salary: Option<i64>,
    #[serde(rename = "maxSalary")]
    pub max_salary: Option<i64>,
    pub search: Option<String>,
}

fn validate_job_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<JobType>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("job_type");
        err.message = Some("Invalid job type".into());
        err
    })
}

fn validate_job_status(value: &str) -> Result<(), ValidationError> {
    value.parse::<JobStatus>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("job_status");
        err.message = Some("Invalid job status".into());
        err
    })
}

// API response types

#[derive(Debug, serde::Serialize)]
pub struct AuthResponse {
    pub jwt: String,
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct ApplicationStatusCount {
    pub status: ApplicationStatus,
    pub count: i64,
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct TopJobStat {
    pub job_title: String,
    pub count: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub total_users: i64,
    pub total_applications: i64,
    pub application_stats: Vec<ApplicationStatusCount>,
    pub top_jobs: Vec<TopJobStat>,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
