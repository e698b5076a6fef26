use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::{
    core::state::AppState,
    models::post::PostStatus,
    models::user_profile::Model as UserProfile,
    repos::{connected_accounts::ConnectedAccountsRepo, posts::PostsRepo},
    services::access::{profile_key, resolve_workspace_access},
    utils::response::APIError,
};

#[derive(Debug, Default, Serialize)]
pub struct StatusCounts {
    pub draft: u64,
    pub scheduled: u64,
    pub posted: u64,
    pub failed: u64,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceSummaryResponse {
    pub posts_by_status: StatusCounts,
    pub pending_approvals: u64,
    pub connected_accounts: u64,
}

/// Per-post metrics come straight from the provider; we hold no copy.
pub async fn post_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
) -> Result<Json<Value>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.view_analytics, "view analytics")?;

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

    let Some(ayr_post_id) = post.ayr_post_id else {
        return Err(APIError::BadRequest(
            "Analytics are only available for published posts".to_string(),
        ));
    };

    let key = profile_key(&access.workspace, &state.config)?;
    let analytics = state.ayrshare.post_analytics(&key, &ayr_post_id).await?;
    Ok(Json(analytics))
}

/// Local rollup for the workspace dashboard, no provider round trip.
pub async fn workspace_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<WorkspaceSummaryResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.view_analytics, "view analytics")?;

    let posts_repo = PostsRepo::new(state.database.clone());
    let counts = posts_repo
        .status_counts(&workspace_id)
        .await
        .map_err(|e| {
            error!("Failed to aggregate post counts: {}", e);
            APIError::InternalServerError("Failed to build the summary".to_string())
        })?;

    let mut posts_by_status = StatusCounts::default();
    for (status, count) in counts {
        match status {
            PostStatus::Draft => posts_by_status.draft = count,
            PostStatus::Scheduled => posts_by_status.scheduled = count,
            PostStatus::Posted => posts_by_status.posted = count,
            PostStatus::Failed => posts_by_status.failed = count,
        }
    }

    let pending_approvals = posts_repo
        .pending_review(&workspace_id)
        .await
        .map_err(|e| {
            error!("Failed to count pending approvals: {}", e);
            APIError::InternalServerError("Failed to build the summary".to_string())
        })?
        .len() as u64;

    let connected_accounts = ConnectedAccountsRepo::new(state.database.clone())
        .list_active(&workspace_id)
        .await
        .map_err(|e| {
            error!("Failed to count connected accounts: {}", e);
            APIError::InternalServerError("Failed to build the summary".to_string())
        })?
        .len() as u64;

    Ok(Json(WorkspaceSummaryResponse {
        posts_by_status,
        pending_approvals,
        connected_accounts,
    }))
}
