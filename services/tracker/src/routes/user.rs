//! User account and dashboard handlers

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::{WithRejection, cookie::CookieJar};
use common::error::DatabaseError;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        IssueFilter, IssueListing, IssuePage, IssueQuery, LoginRequest, LoginResponse, NewUser,
        RegisterRequest, UpdateProfileRequest, UpdateUser, issue::page_offset,
    },
    repositories::user::{hash_password, verify_password},
    response::{ApiResponse, Envelope},
    session::{removal_cookie, session_cookie},
    state::AppState,
    validation::{validate_profile_update, validate_registration},
};

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    validate_registration(&payload).map_err(ApiError::BadRequest)?;

    if state
        .user_repository
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    if state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::internal("Failed to register user", e))?;

    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash,
    };

    // Two concurrent registrations can both pass the lookups above
    let user = state
        .user_repository
        .create(&new_user)
        .await
        .map_err(duplicate_user_error)?;

    info!("Registered user {}", user.id);
    Ok(Envelope::created(user, "User registered successfully"))
}

const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Map a unique violation on `users` to the same 400 the lookups produce
fn duplicate_user_error(err: DatabaseError) -> ApiError {
    if !err.is_unique_violation() {
        return ApiError::Database(err);
    }

    match err.constraint() {
        Some(USERNAME_CONSTRAINT) => ApiError::BadRequest("Username already exists".to_string()),
        _ => ApiError::BadRequest("Email already exists".to_string()),
    }
}

/// Log in and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.username);

    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = verify_password(&user.password_hash, &payload.password)
        .map_err(|e| ApiError::internal("Failed to log in user", e))?;

    if !valid {
        warn!("Invalid password for user: {}", payload.username);
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    let token = state
        .jwt_service
        .generate_token(&user)
        .map_err(|e| ApiError::internal("Failed to log in user", e))?;

    let jar = jar.add(session_cookie(
        token,
        state.jwt_service.token_expiry(),
        state.config.production,
    ));

    Ok((
        jar,
        Envelope::ok(LoginResponse::from(&user), "User logged in successfully"),
    ))
}

/// Clear the session cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(removal_cookie(state.config.production));
    (jar, Json(ApiResponse::message("User logged out successfully")))
}

/// Profile of the caller
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Envelope::ok(profile, "User data retrieved successfully"))
}

/// Edit the caller's profile
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    validate_profile_update(&payload).map_err(ApiError::BadRequest)?;

    if let Some(email) = &payload.email {
        let taken = state
            .user_repository
            .find_by_email(email)
            .await?
            .is_some_and(|existing| existing.id != user.id);

        if taken {
            return Err(ApiError::BadRequest("Email already exists".to_string()));
        }
    }

    let update = UpdateUser {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };

    let profile = state
        .user_repository
        .update(user.id, &update)
        .await
        .map_err(duplicate_user_error)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Envelope::ok(profile, "User updated successfully"))
}

/// Issues of the caller, filtered and optionally paginated
pub async fn my_issues(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<IssueQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let page = query.page_number().map_err(ApiError::BadRequest)?;
    let filter = IssueFilter::from_query(user.id, &query).map_err(ApiError::BadRequest)?;

    let listing = match page {
        Some(page) => {
            let page_size = state.config.page_size;
            let total_count = state.issue_repository.count(&filter).await?;
            let issues = state
                .issue_repository
                .list(
                    &filter,
                    Some((i64::from(page_size), page_offset(page, page_size))),
                )
                .await?;

            IssueListing::Paged(IssuePage::new(issues, total_count, page, page_size))
        }
        None => IssueListing::All(state.issue_repository.list(&filter, None).await?),
    };

    Ok(Envelope::ok(listing, "Issues retrieved successfully"))
}

/// Issue counts of the caller by status
pub async fn statistics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let stats = state.issue_repository.statistics(user.id).await?;
    Ok(Envelope::ok(stats, "Statistics retrieved successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_conflict_errors_pass_through() {
        let err = duplicate_user_error(DatabaseError::Configuration("bad url".to_string()));
        assert!(matches!(err, ApiError::Database(_)));
    }
}
