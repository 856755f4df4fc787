//! Authorization gate.
//!
//! `authenticate` turns a bearer token (header or `token` cookie) into an
//! [`AuthUser`] stored in request extensions; `require_role` gates a route on
//! that identity. Authentication always runs before role checking.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::AppState;
use crate::types::{ApiError, Role};

/// Signed claim set carried by every token.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Identity attached to the request after authentication.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

pub fn issue_token(user_id: Uuid, role: Role, auth: &AuthConfig) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        iat: now,
        exp: now + auth.token_expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|_| ApiError::Internal("Failed to sign token".to_string()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthenticated("Invalid or expired token"))
}

/// Bearer token from the Authorization header, falling back to the cookie
/// named `token`.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let jar = CookieJar::from_headers(headers);
    jar.get("token")
        .filter(|c| !c.value().is_empty())
        .map(|c| c.value().to_string())
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthenticated("Authorization token missing"))?;

    let claims = decode_token(&token, &state.config.auth.secret)?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Role gate; must be layered after [`authenticate`].
pub async fn require_role(
    required: Role,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthenticated("No user info found"))?;

    if user.role != required {
        tracing::warn!(user_id = %user.id, required = %required, "insufficient role");
        return Err(ApiError::forbidden("Forbidden: Insufficient permissions"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            token_expiration: 3600,
        }
    }

    #[test]
    fn issued_token_decodes_to_same_claims() {
        let auth = test_auth_config();
        let user_id = Uuid::new_v4();

        let token = issue_token(user_id, Role::Admin, &auth).unwrap();
        let claims = decode_token(&token, &auth.secret).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = test_auth_config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth.secret.as_bytes()),
        )
        .unwrap();

        assert!(decode_token(&token, &auth.secret).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let auth = test_auth_config();
        let token = issue_token(Uuid::new_v4(), Role::User, &auth).unwrap();

        assert!(decode_token(&token, "different-secret").is_err());
    }

    #[test]
    fn extract_token_prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
        headers.insert(header::COOKIE, "token=from-cookie".parse().unwrap());

        assert_eq!(extract_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn extract_token_falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "session=x; token=from-cookie".parse().unwrap());

        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn extract_token_rejects_non_bearer_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());

        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn extract_token_ignores_empty_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        headers.insert(header::COOKIE, "token=".parse().unwrap());

        assert_eq!(extract_token(&headers), None);
    }
}
