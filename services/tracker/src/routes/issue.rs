//! Issue handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{CreateIssueRequest, NewIssue, UpdateIssueRequest},
    ownership::{load_owned_issue, parse_issue_id},
    response::{ApiResponse, Envelope},
    state::AppState,
    validation::{validate_issue_update, validate_new_issue},
};

/// Create an issue owned by the caller
pub async fn create_issue(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateIssueRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    validate_new_issue(&payload).map_err(ApiError::BadRequest)?;

    let new_issue = NewIssue {
        title: payload.title,
        description: payload.description,
        severity: payload.severity,
        priority: payload.priority,
        status: payload.status,
        created_by: user.id,
    };

    let issue = state.issue_repository.create(&new_issue).await?;
    info!("Created issue #{} for user {}", issue.issue_id, user.id);

    Ok(Envelope::created(issue, "Issue created successfully"))
}

/// Get one of the caller's issues
pub async fn get_issue(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let issue_id = parse_issue_id(&id)?;
    let issue = load_owned_issue(&state, issue_id, user.id).await?;

    Ok(Envelope::ok(issue, "Issue retrieved successfully"))
}

/// Partially update one of the caller's issues
pub async fn update_issue(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateIssueRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let issue_id = parse_issue_id(&id)?;
    validate_issue_update(&payload).map_err(ApiError::BadRequest)?;
    load_owned_issue(&state, issue_id, user.id).await?;

    let issue = state
        .issue_repository
        .update(issue_id, user.id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

    Ok(Envelope::ok(issue, "Issue updated successfully"))
}

/// Delete one of the caller's issues
pub async fn delete_issue(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let issue_id = parse_issue_id(&id)?;
    load_owned_issue(&state, issue_id, user.id).await?;

    if !state.issue_repository.delete(issue_id, user.id).await? {
        return Err(ApiError::NotFound("Issue not found".to_string()));
    }

    Ok(Json(ApiResponse::message("Issue deleted successfully")))
}
