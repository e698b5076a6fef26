use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    core::approval::{can_edit, can_publish, submit},
    core::state::AppState,
    models::post::{ApprovalStatus, Model as Post, PostStatus},
    models::user_profile::Model as UserProfile,
    repos::posts::{PostFilter, PostsRepo},
    services::access::{profile_key, resolve_workspace_access, WorkspaceAccess},
    services::ayrshare::unsupported_platforms,
    services::ProviderError,
    utils::response::APIError,
};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub platforms: Vec<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub media_urls: Option<Vec<String>>,
    /// Absent = keep, null = clear, value = reschedule.
    #[serde(default)]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub status: Option<PostStatus>,
    pub approval_status: Option<ApprovalStatus>,
    pub author_id: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub schedule_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Serialize)]
pub struct DeletePostResponse {
    pub deleted: bool,
}

fn validate_composition(
    content: &str,
    platforms: &[String],
    media_urls: &[String],
) -> Result<(), APIError> {
    if content.trim().is_empty() && media_urls.is_empty() {
        return Err(APIError::BadRequest(
            "A post needs content or at least one media attachment".to_string(),
        ));
    }
    if platforms.is_empty() {
        return Err(APIError::BadRequest(
            "Select at least one platform".to_string(),
        ));
    }
    let unknown = unsupported_platforms(platforms);
    if !unknown.is_empty() {
        return Err(APIError::BadRequest(format!(
            "Unsupported platforms: {}",
            unknown.join(", ")
        )));
    }
    Ok(())
}

/// Load a post and pin it to the workspace in the path; a post id from
/// another workspace reads as missing.
async fn load_post(
    state: &AppState,
    workspace_id: &str,
    post_id: &str,
) -> Result<Post, APIError> {
    let post = PostsRepo::new(state.database.clone())
        .get_by_id(post_id)
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
    Ok(post)
}

fn require_post_edit(access: &WorkspaceAccess, post: &Post, user_id: &str) -> Result<(), APIError> {
    let own = post.author_id == user_id;
    let allowed = (own && access.caps.edit_own_posts) || access.caps.edit_all_posts;
    access.require(allowed, "edit this post")
}

fn require_post_delete(
    access: &WorkspaceAccess,
    post: &Post,
    user_id: &str,
) -> Result<(), APIError> {
    let own = post.author_id == user_id;
    let allowed = (own && access.caps.delete_own_posts) || access.caps.delete_all_posts;
    access.require(allowed, "delete this post")
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.create_posts, "create posts")?;

    let content = payload.content.unwrap_or_default();
    validate_composition(&content, &payload.platforms, &payload.media_urls)?;

    if let Some(at) = payload.scheduled_at {
        if at <= Utc::now() {
            return Err(APIError::BadRequest(
                "Scheduled time must be in the future".to_string(),
            ));
        }
    }

    let post = PostsRepo::new(state.database.clone())
        .create(
            workspace_id,
            user.id.clone(),
            content,
            payload.platforms,
            payload.media_urls,
            payload.scheduled_at.map(|at| at.naive_utc()),
        )
        .await
        .map_err(|e| {
            error!("Failed to create post: {}", e);
            APIError::InternalServerError("Failed to create post".to_string())
        })?;

    Ok(Json(post))
}

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>, APIError> {
    resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;

    let page = query.page.unwrap_or(0);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let filter = PostFilter {
        status: query.status,
        approval_status: query.approval_status,
        author_id: query.author_id,
    };

    let (posts, total) = PostsRepo::new(state.database.clone())
        .list_paginated(&workspace_id, filter, page, per_page)
        .await
        .map_err(|e| {
            error!("Failed to list posts: {}", e);
            APIError::InternalServerError("Failed to list posts".to_string())
        })?;

    Ok(Json(PostListResponse {
        posts,
        total,
        page,
        per_page,
    }))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
) -> Result<Json<Post>, APIError> {
    resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let post = load_post(&state, &workspace_id, &post_id).await?;
    Ok(Json(post))
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let post = load_post(&state, &workspace_id, &post_id).await?;
    require_post_edit(&access, &post, &user.id)?;

    if !can_edit(post.status, post.approval_status) {
        return Err(APIError::Conflict(format!(
            "A {} post that is {} cannot be edited",
            post.status.label(),
            post.approval_status.label()
        )));
    }

    let content = payload.content.clone().unwrap_or_else(|| post.content.clone());
    let platforms = payload.platforms.clone().unwrap_or_else(|| post.platform_list());
    let media_urls = payload
        .media_urls
        .clone()
        .unwrap_or_else(|| post.media_url_list());
    validate_composition(&content, &platforms, &media_urls)?;

    if let Some(Some(at)) = payload.scheduled_at {
        if at <= Utc::now() {
            return Err(APIError::BadRequest(
                "Scheduled time must be in the future".to_string(),
            ));
        }
    }

    let post = PostsRepo::new(state.database.clone())
        .update_content(
            post,
            payload.content,
            payload.platforms,
            payload.media_urls,
            payload
                .scheduled_at
                .map(|opt| opt.map(|at| at.naive_utc())),
        )
        .await
        .map_err(|e| {
            error!("Failed to update post {}: {}", post_id, e);
            APIError::InternalServerError("Failed to update post".to_string())
        })?;

    Ok(Json(post))
}

/// Deleting a scheduled post must first pull it back from the provider;
/// if that fails the row stays, otherwise the post would still go out.
/// For already-published posts the provider delete is best-effort since
/// some networks refuse removal.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
) -> Result<Json<DeletePostResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let post = load_post(&state, &workspace_id, &post_id).await?;
    require_post_delete(&access, &post, &user.id)?;

    if let Some(ayr_post_id) = &post.ayr_post_id {
        match post.status {
            PostStatus::Scheduled => {
                let key = profile_key(&access.workspace, &state.config)?;
                state.ayrshare.delete_post(&key, ayr_post_id).await?;
            }
            PostStatus::Posted => {
                if let Ok(key) = profile_key(&access.workspace, &state.config) {
                    if let Err(e) = state.ayrshare.delete_post(&key, ayr_post_id).await {
                        warn!("Provider delete failed for posted {}: {}", post_id, e);
                    }
                }
            }
            _ => {}
        }
    }

    PostsRepo::new(state.database.clone())
        .delete(&post_id)
        .await
        .map_err(|e| {
            error!("Failed to delete post {}: {}", post_id, e);
            APIError::InternalServerError("Failed to delete post".to_string())
        })?;

    info!("Post {} deleted by {}", post_id, user.email);

    Ok(Json(DeletePostResponse { deleted: true }))
}

/// Hand a draft to the review pipeline. Where it lands depends on the
/// workspace approval mode; with approvals off this is a no-op that leaves
/// the draft immediately publishable.
pub async fn submit_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
) -> Result<Json<Post>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let post = load_post(&state, &workspace_id, &post_id).await?;
    require_post_edit(&access, &post, &user.id)?;

    if post.status != PostStatus::Draft {
        return Err(APIError::Conflict(format!(
            "Only drafts can be submitted for review, this post is {}",
            post.status.label()
        )));
    }

    let next = submit(access.workspace.approval_mode, post.approval_status)?;

    let post = PostsRepo::new(state.database.clone())
        .set_approval(post, next)
        .await
        .map_err(|e| {
            error!("Failed to submit post {}: {}", post_id, e);
            APIError::InternalServerError("Failed to submit post".to_string())
        })?;

    Ok(Json(post))
}

async fn dispatch_to_provider(
    state: &AppState,
    access: &WorkspaceAccess,
    post: Post,
    schedule_at: Option<DateTime<Utc>>,
) -> Result<Post, APIError> {
    let key = profile_key(&access.workspace, &state.config)?;
    let posts_repo = PostsRepo::new(state.database.clone());

    let platforms = post.platform_list();
    let media_urls = post.media_url_list();

    match state
        .ayrshare
        .send_post(&key, &post.content, &platforms, &media_urls, schedule_at)
        .await
    {
        Ok(outcome) => {
            // A 2xx can still carry a per-platform rejection in the body.
            if let Some(detail) = outcome.failure_detail() {
                let post_id = post.id.clone();
                if let Err(db_err) = posts_repo.mark_failed(post, detail.clone()).await {
                    error!(
                        "Failed to record publish failure for {}: {}",
                        post_id, db_err
                    );
                }
                return Err(APIError::Provider {
                    status: 200,
                    body: detail,
                });
            }

            let post = if let Some(at) = schedule_at {
                posts_repo
                    .mark_scheduled(post, outcome.id, at.naive_utc())
                    .await
            } else {
                posts_repo.mark_posted(post, outcome.id).await
            }
            .map_err(|e| {
                error!("Failed to record publish outcome: {}", e);
                APIError::InternalServerError("Failed to record publish outcome".to_string())
            })?;
            Ok(post)
        }
        Err(e) => {
            // Record the failure before surfacing it so the post can be
            // retried later.
            let detail = match &e {
                ProviderError::Api { body, .. } => body.clone(),
                other => other.to_string(),
            };
            let post_id = post.id.clone();
            if let Err(db_err) = posts_repo.mark_failed(post, detail).await {
                error!("Failed to record publish failure for {}: {}", post_id, db_err);
            }
            Err(e.into())
        }
    }
}

/// Send a post out now, or hand it to the provider's scheduler. The provider
/// owns delivery from here; we only track the returned post id.
pub async fn publish_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
    Json(payload): Json<PublishRequest>,
) -> Result<Json<Post>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let post = load_post(&state, &workspace_id, &post_id).await?;
    require_post_edit(&access, &post, &user.id)?;

    if !can_publish(post.status, post.approval_status) {
        return Err(APIError::Conflict(format!(
            "A {} post that is {} cannot be published",
            post.status.label(),
            post.approval_status.label()
        )));
    }

    if let Some(at) = payload.schedule_at {
        if at <= Utc::now() {
            return Err(APIError::BadRequest(
                "Scheduled time must be in the future".to_string(),
            ));
        }
    }
    // A stored slot that already passed means "publish now"; only an explicit
    // past time from the caller is an error.
    let schedule_at = payload.schedule_at.or_else(|| {
        post.scheduled_at
            .map(|naive| Utc.from_utc_datetime(&naive))
            .filter(|at| *at > Utc::now())
    });

    let platforms = post.platform_list();
    validate_composition(&post.content, &platforms, &post.media_url_list())?;

    let post = dispatch_to_provider(&state, &access, post, schedule_at).await?;
    info!(
        "Post {} {} by {}",
        post_id,
        post.status.label(),
        user.email
    );
    Ok(Json(post))
}

/// Re-run a failed publish. Only failed posts qualify; the approval verdict
/// they carried stays valid.
pub async fn retry_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
    Json(payload): Json<PublishRequest>,
) -> Result<Json<Post>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let post = load_post(&state, &workspace_id, &post_id).await?;
    require_post_edit(&access, &post, &user.id)?;

    if post.status != PostStatus::Failed {
        return Err(APIError::Conflict(format!(
            "Only failed posts can be retried, this post is {}",
            post.status.label()
        )));
    }
    if !can_publish(post.status, post.approval_status) {
        return Err(APIError::Conflict(
            "This post is still waiting on approval".to_string(),
        ));
    }

    // Keep the original slot when it is still ahead of us, otherwise go out
    // immediately.
    let schedule_at = payload
        .schedule_at
        .or_else(|| post.scheduled_at.map(|naive| Utc.from_utc_datetime(&naive)))
        .filter(|at| *at > Utc::now());

    let post = dispatch_to_provider(&state, &access, post, schedule_at).await?;
    Ok(Json(post))
}

/// Ask the provider what happened to a scheduled post and mirror the answer.
pub async fn refresh_post_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, post_id)): Path<(String, String)>,
) -> Result<Json<Post>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let post = load_post(&state, &workspace_id, &post_id).await?;

    let Some(ayr_post_id) = post.ayr_post_id.clone() else {
        return Err(APIError::BadRequest(
            "This post was never sent to the provider".to_string(),
        ));
    };

    let key = profile_key(&access.workspace, &state.config)?;
    let record = state.ayrshare.post_history(&key, &ayr_post_id).await?;

    let provider_status = record
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string();

    let posts_repo = PostsRepo::new(state.database.clone());
    let post = match provider_status.as_str() {
        "success" | "posted" => posts_repo.mark_posted(post, None).await,
        "error" | "failed" => {
            let detail = record
                .get("errors")
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Provider reported a failure".to_string());
            posts_repo.mark_failed(post, detail).await
        }
        _ => Ok(post),
    }
    .map_err(|e| {
        error!("Failed to refresh post {}: {}", post_id, e);
        APIError::InternalServerError("Failed to refresh post".to_string())
    })?;

    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_requires_content_or_media() {
        let err = validate_composition("   ", &["twitter".to_string()], &[]);
        assert!(err.is_err());

        let media_only = validate_composition(
            "",
            &["twitter".to_string()],
            &["https://cdn.example/a.png".to_string()],
        );
        assert!(media_only.is_ok());
    }

    #[test]
    fn test_composition_requires_known_platforms() {
        assert!(validate_composition("hi", &[], &[]).is_err());
        assert!(validate_composition("hi", &["friendster".to_string()], &[]).is_err());
        assert!(validate_composition("hi", &["twitter".to_string()], &[]).is_ok());
    }
}
