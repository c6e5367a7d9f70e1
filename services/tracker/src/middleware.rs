//! Authentication middleware for session token validation

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::ApiError, session::token_from_jar, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    /// Raw session token, forwarded to the AI service
    pub token: String,
}

/// Session token from the cookie, falling back to a bearer header
pub fn extract_token(jar: &CookieJar, req: &Request<Body>) -> Option<String> {
    token_from_jar(jar).or_else(|| {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

/// Authentication middleware
///
/// Rejects with 401 when no token is sent and with 403 when the token does
/// not verify. On success the caller is available to handlers as an
/// `Extension<AuthUser>`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&jar, &req)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let claims = state.jwt_service.validate_token(&token).map_err(|e| {
        warn!("Failed to validate token: {}", e);
        ApiError::Forbidden("Forbidden".to_string())
    })?;

    debug!("Authenticated request for user {}", claims.id);

    let user = AuthUser {
        id: claims.id,
        username: claims.username,
        email: claims.email,
        first_name: claims.first_name,
        token,
    };

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
