//! Ownership checks for issue access

use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::Issue,
    state::AppState,
};

/// Parse an issue id taken from the URL
pub fn parse_issue_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid issue id".to_string()))
}

/// Accept `issue` only if it exists and belongs to `user_id`
pub fn ensure_owner(issue: Option<Issue>, user_id: Uuid) -> ApiResult<Issue> {
    let issue = issue.ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

    if !issue.is_owned_by(user_id) {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this issue".to_string(),
        ));
    }

    Ok(issue)
}

/// Load an issue and check that `user_id` owns it
pub async fn load_owned_issue(state: &AppState, issue_id: Uuid, user_id: Uuid) -> ApiResult<Issue> {
    let issue = state.issue_repository.find_by_id(issue_id).await?;
    ensure_owner(issue, user_id)
}
