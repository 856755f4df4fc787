use crate::models::*;
use crate::types::{ApplicationStatus, JobStatus, JobType, Role};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// Filters accepted by the public job listing.
#[derive(Debug, Default)]
pub struct JobFilters {
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
    pub search: Option<String>,
}

/// True when the error is a Postgres unique-constraint violation (23505).
/// Duplicate signups and duplicate applications are detected this way
/// instead of with a racy check-then-create.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

pub struct DatabaseOperations;

impl DatabaseOperations {
    // User operations

    pub async fn create_user(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(pool)
        .await
    }

    pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    // Job operations

    pub async fn create_job(
        pool: &PgPool,
        title: &str,
        description: &str,
        location: &str,
        salary: Option<i64>,
        job_type: JobType,
        posted_by: Uuid,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, description, location, salary, job_type, posted_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(salary)
        .bind(job_type)
        .bind(posted_by)
        .fetch_one(pool)
        .await
    }

    pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn get_job_with_poster(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<JobWithPoster>, sqlx::Error> {
        sqlx::query_as::<_, JobWithPoster>(
            r#"
            SELECT j.*, u.email AS posted_by_email, u.role AS posted_by_role
            FROM jobs j
            JOIN users u ON u.id = j.posted_by
            WHERE j.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Public listing: OPEN jobs only, newest first.
    pub async fn list_open_jobs(
        pool: &PgPool,
        filters: &JobFilters,
    ) -> Result<Vec<JobWithPoster>, sqlx::Error> {
        let mut query = QueryBuilder::new(
            "SELECT j.*, u.email AS posted_by_email, u.role AS posted_by_role \
             FROM jobs j JOIN users u ON u.id = j.posted_by WHERE j.status = ",
        );
        query.push_bind(JobStatus::Open);

        if let Some(location) = &filters.location {
            query
                .push(" AND j.location ILIKE ")
                .push_bind(format!("%{}%", location));
        }
        if let Some(job_type) = filters.job_type {
            query.push(" AND j.job_type = ").push_bind(job_type);
        }
        if let Some(min_salary) = filters.min_salary {
            query.push(" AND j.salary >= ").push_bind(min_salary);
        }
        if let Some(max_salary) = filters.max_salary {
            query.push(" AND j.salary <= ").push_bind(max_salary);
        }
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            query
                .push(" AND (j.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR j.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query.push(" ORDER BY j.created_at DESC");

        query
            .build_query_as::<JobWithPoster>()
            .fetch_all(pool)
            .await
    }

    pub async fn update_job(
        pool: &PgPool,
        id: Uuid,
        title: &str,
        description: &str,
        location: &str,
        salary: Option<i64>,
        job_type: JobType,
        status: JobStatus,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, location = $4,
                salary = $5, job_type = $6, status = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(salary)
        .bind(job_type)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    pub async fn update_job_status(
        pool: &PgPool,
        id: Uuid,
        status: JobStatus,
    ) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>("UPDATE jobs SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    // Application operations

    pub async fn create_application(
        pool: &PgPool,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Application, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (applicant_id, job_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(applicant_id)
        .bind(job_id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_applications_for_user(
        pool: &PgPool,
        applicant_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, sqlx::Error> {
        sqlx::query_as::<_, ApplicationWithJob>(
            r#"
            SELECT a.id, a.job_id, a.status, a.created_at,
                   j.title AS job_title, j.location AS job_location,
                   j.job_type AS job_type, j.status AS job_status,
                   j.salary AS job_salary
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.applicant_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(applicant_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_applications_for_job(
        pool: &PgPool,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>, sqlx::Error> {
        sqlx::query_as::<_, ApplicationWithApplicant>(
            r#"
            SELECT a.id, a.job_id, a.status, a.created_at, a.applicant_id,
                   u.email AS applicant_email, j.title AS job_title
            FROM applications a
            JOIN users u ON u.id = a.applicant_id
            JOIN jobs j ON j.id = a.job_id
            WHERE a.job_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update_application_status(
        pool: &PgPool,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            "UPDATE applications SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    // Dashboard aggregation

    pub async fn count_jobs(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM jobs").fetch_one(pool).await
    }

    pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await
    }

    pub async fn count_applications(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(pool)
            .await
    }

    pub async fn application_status_counts(
        pool: &PgPool,
    ) -> Result<Vec<ApplicationStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, ApplicationStatusCount>(
            "SELECT status, COUNT(*) AS count FROM applications GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Jobs ranked by application count; creation time breaks ties so the
    /// ordering is deterministic.
    pub async fn top_jobs_by_applications(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<TopJobStat>, sqlx::Error> {
        sqlx::query_as::<_, TopJobStat>(
            r#"
            SELECT j.title AS job_title, COUNT(a.id) AS count
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            GROUP BY j.id, j.title, j.created_at
            ORDER BY count DESC, j.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
