use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    core::approval::{review, ApprovalAction},
    core::state::AppState,
    models::post::Model as Post,
    models::user_profile::Model as UserProfile,
    repos::posts::PostsRepo,
    services::access::resolve_workspace_access,
    utils::response::APIError,
};

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PendingReviewResponse {
    pub posts: Vec<Post>,
}

/// The review queue, oldest first. Visible to anyone who can act on it.
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<PendingReviewResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(
        access.caps.approve_posts || access.caps.final_approval,
        "review posts",
    )?;

    let posts = PostsRepo::new(state.database.clone())
        .pending_review(&workspace_id)
        .await
        .map_err(|e| {
            error!("Failed to load review queue: {}", e);
            APIError::InternalServerError("Failed to load review queue".to_string())
        })?;

    Ok(Json(PendingReviewResponse { posts }))
}

async fn apply_review(
    state: &AppState,
    user: &UserProfile,
    workspace_id: &str,
    post_id: &str,
    action: ApprovalAction,
    comment: Option<String>,
) -> Result<Post, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, workspace_id).await?;

    let posts_repo = PostsRepo::new(state.database.clone());
    let post = posts_repo.get_by_id(post_id).await.map_err(|e| match e {
        sea_orm::DbErr::RecordNotFound(_) => APIError::NotFound("Post not found".to_string()),
        e => {
            error!("Failed to load post {}: {}", post_id, e);
            APIError::InternalServerError("Failed to load post".to_string())
        }
    })?;
    if post.workspace_id != workspace_id {
        return Err(APIError::NotFound("Post not found".to_string()));
    }

    let next = review(
        action,
        access.workspace.approval_mode,
        post.approval_status,
        &access.caps,
    )?;

    let post = match action {
        // Forwarding is routing, not a verdict; leave the review fields to
        // whoever actually decides.
        ApprovalAction::ForwardToClient => posts_repo.set_approval(post, next).await,
        _ => {
            posts_repo
                .set_review(post, next, comment, user.id.clone())
                .await
        }
    }
    .map_err(|e| {
        error!("Failed to record review on {}: {}", post_id, e);
        APIError::InternalServerError("Failed to record review".to_string())
    })?;

    info!(
        "Post {} moved to {} by {}",
        post_id,
        post.approval_status.label(),
        user.email
    );

    Ok(post)
}

pub async fn approve_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Post>, APIError> {
    let post = apply_review(
        &state,
        &user,
        &workspace_id,
        &post_id,
        ApprovalAction::Approve,
        payload.comment,
    )
    .await?;
    Ok(Json(post))
}

pub async fn forward_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
) -> Result<Json<Post>, APIError> {
    let post = apply_review(
        &state,
        &user,
        &workspace_id,
        &post_id,
        ApprovalAction::ForwardToClient,
        None,
    )
    .await?;
    Ok(Json(post))
}

pub async fn request_changes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Post>, APIError> {
    let comment = payload
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    if comment.is_none() {
        return Err(APIError::BadRequest(
            "Requesting changes needs a comment explaining what to change".to_string(),
        ));
    }

    let post = apply_review(
        &state,
        &user,
        &workspace_id,
        &post_id,
        ApprovalAction::RequestChanges,
        comment,
    )
    .await?;
    Ok(Json(post))
}

pub async fn reject_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Post>, APIError> {
    let post = apply_review(
        &state,
        &user,
        &workspace_id,
        &post_id,
        ApprovalAction::Reject,
        payload.comment,
    )
    .await?;
    Ok(Json(post))
}
