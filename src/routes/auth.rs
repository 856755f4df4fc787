use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::db::{is_unique_violation, DatabaseOperations};
use crate::middleware::auth::issue_token;
use crate::models::{AppState, AuthResponse, SigninRequest, SignupRequest};
use crate::security;
use crate::types::{ApiError, ApiResult, Role, ValidatedJson};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/signin", post(signin))
        .with_state(state)
}

async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let role = match payload.role.as_deref() {
        Some(value) => value.parse::<Role>()?,
        None => Role::User,
    };

    let password_hash = security::hash_password(&payload.password)?;

    // The unique index on users.email is the source of truth for duplicates.
    let user =
        match DatabaseOperations::create_user(&state.pool, &payload.email, &password_hash, role)
            .await
        {
            Ok(user) => user,
            Err(err) if is_unique_violation(&err) => {
                return Err(ApiError::conflict("User already exists"));
            }
            Err(err) => return Err(err.into()),
        };

    info!(user_id = %user.id, role = %user.role, "user signed up");

    let jwt = issue_token(user.id, user.role, &state.config.auth)?;

    Ok(Json(AuthResponse { jwt }))
}

async fn signin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SigninRequest>,
) -> ApiResult<Json<AuthResponse>> {
    // Unknown email and wrong password produce the same response.
    let user = DatabaseOperations::get_user_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| ApiError::forbidden("Invalid email or password"))?;

    security::verify_password(&payload.password, &user.password_hash)?;

    info!(user_id = %user.id, "user signed in");

    let jwt = issue_token(user.id, user.role, &state.config.auth)?;

    Ok(Json(AuthResponse { jwt }))
}
