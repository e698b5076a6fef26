use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;
use tracing::error;

use crate::{
    core::state::AppState,
    models::post::PostStatus,
    models::user_profile::Model as UserProfile,
    repos::posts::PostsRepo,
    services::access::{profile_key, resolve_workspace_access},
    services::ayrshare::SUPPORTED_PLATFORMS,
    utils::response::APIError,
};

/// Comments left on a published post, straight from the provider.
pub async fn post_comments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
) -> Result<Json<Value>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.access_inbox, "read the inbox")?;

    let post = PostsRepo::new(state.database.clone())
        .get_by_id(&post_id)
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => APIError::NotFound("Post not found".to_string()),
            e => {
                error!("Failed to load post {}: {}", post_id, e);
                APIError::InternalServerError("Failed to load post".to_string())
            }
        })?;
    if post.workspace_id != workspace_id {
        return Err(APIError::NotFound("Post not found".to_string()));
    }

    let ayr_post_id = match (&post.status, &post.ayr_post_id) {
        (PostStatus::Posted, Some(id)) => id.clone(),
        _ => {
            return Err(APIError::BadRequest(
                "Comments are only available for published posts".to_string(),
            ))
        }
    };

    let key = profile_key(&access.workspace, &state.config)?;
    let comments = state.ayrshare.post_comments(&key, &ayr_post_id).await?;
    Ok(Json(comments))
}

/// Direct messages for one platform's linked account.
pub async fn platform_messages(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, platform)): Path<(String, String)>,
) -> Result<Json<Value>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.access_inbox, "read the inbox")?;

    if !SUPPORTED_PLATFORMS.contains(&platform.as_str()) {
        return Err(APIError::BadRequest(format!(
            "Unsupported platform: {}",
            platform
        )));
    }

    let key = profile_key(&access.workspace, &state.config)?;
    let messages = state.ayrshare.direct_messages(&key, &platform).await?;
    Ok(Json(messages))
}
