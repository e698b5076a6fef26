use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde_json::json;

use crate::{
    models::post::{self, ActiveModel, ApprovalStatus, Entity as PostEntity, Model as Post, PostStatus},
    utils::crypto::generate_uuid,
};

/// Optional narrowing for the workspace post listing.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub approval_status: Option<ApprovalStatus>,
    pub author_id: Option<String>,
}

pub struct PostsRepo {
    db: DatabaseConnection,
}

impl PostsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// New posts always start as unapproved drafts; scheduling and review
    /// move them on from there.
    pub async fn create(
        &self,
        workspace_id: String,
        author_id: String,
        content: String,
        platforms: Vec<String>,
        media_urls: Vec<String>,
        scheduled_at: Option<chrono::NaiveDateTime>,
    ) -> Result<Post, DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let post_model = ActiveModel {
            id: Set(generate_uuid()),
            workspace_id: Set(workspace_id),
            author_id: Set(author_id),
            content: Set(content),
            platforms: Set(json!(platforms)),
            media_urls: Set(json!(media_urls)),
            status: Set(PostStatus::Draft),
            approval_status: Set(ApprovalStatus::None),
            scheduled_at: Set(scheduled_at),
            posted_at: Set(None),
            ayr_post_id: Set(None),
            last_error: Set(None),
            review_comment: Set(None),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let post = post_model.insert(&self.db).await?;
        Ok(post)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Post, DbErr> {
        let post = PostEntity::find_by_id(id).one(&self.db).await?;
        match post {
            Some(p) => Ok(p),
            None => Err(DbErr::RecordNotFound("Post not found".to_string())),
        }
    }

    pub async fn list_paginated(
        &self,
        workspace_id: &str,
        filter: PostFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Post>, u64), DbErr> {
        let mut query = PostEntity::find()
            .filter(post::Column::WorkspaceId.eq(workspace_id));

        if let Some(status) = filter.status {
            query = query.filter(post::Column::Status.eq(status));
        }
        if let Some(approval) = filter.approval_status {
            query = query.filter(post::Column::ApprovalStatus.eq(approval));
        }
        if let Some(author_id) = filter.author_id {
            query = query.filter(post::Column::AuthorId.eq(author_id));
        }

        let query = query.order_by_desc(post::Column::CreatedAt);
        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let posts = paginator.fetch_page(page).await?;

        Ok((posts, total))
    }

    /// Everything waiting on a reviewer, oldest first so queues drain fairly.
    pub async fn pending_review(&self, workspace_id: &str) -> Result<Vec<Post>, DbErr> {
        let posts = PostEntity::find()
            .filter(post::Column::WorkspaceId.eq(workspace_id))
            .filter(post::Column::ApprovalStatus.is_in([
                ApprovalStatus::Pending,
                ApprovalStatus::PendingInternal,
                ApprovalStatus::PendingClient,
            ]))
            .order_by_asc(post::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(posts)
    }

    pub async fn update_content(
        &self,
        post: Post,
        content: Option<String>,
        platforms: Option<Vec<String>>,
        media_urls: Option<Vec<String>>,
        scheduled_at: Option<Option<chrono::NaiveDateTime>>,
    ) -> Result<Post, DbErr> {
        let mut post: ActiveModel = post.into();
        if let Some(content) = content {
            post.content = Set(content);
        }
        if let Some(platforms) = platforms {
            post.platforms = Set(json!(platforms));
        }
        if let Some(media_urls) = media_urls {
            post.media_urls = Set(json!(media_urls));
        }
        if let Some(scheduled_at) = scheduled_at {
            post.scheduled_at = Set(scheduled_at);
        }
        post.updated_at = Set(chrono::Utc::now().naive_utc());
        post.update(&self.db).await
    }

    /// Submit and forward move approval state without touching review fields.
    pub async fn set_approval(
        &self,
        post: Post,
        approval_status: ApprovalStatus,
    ) -> Result<Post, DbErr> {
        let mut post: ActiveModel = post.into();
        post.approval_status = Set(approval_status);
        post.updated_at = Set(chrono::Utc::now().naive_utc());
        post.update(&self.db).await
    }

    /// Reviewer verdicts record who decided and any comment; approving
    /// clears a stale changes-requested comment.
    pub async fn set_review(
        &self,
        post: Post,
        approval_status: ApprovalStatus,
        comment: Option<String>,
        reviewer_id: String,
    ) -> Result<Post, DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let mut post: ActiveModel = post.into();
        post.approval_status = Set(approval_status);
        post.review_comment = Set(comment);
        post.reviewed_by = Set(Some(reviewer_id));
        post.reviewed_at = Set(Some(now));
        post.updated_at = Set(now);
        post.update(&self.db).await
    }

    pub async fn mark_scheduled(
        &self,
        post: Post,
        ayr_post_id: Option<String>,
        scheduled_at: chrono::NaiveDateTime,
    ) -> Result<Post, DbErr> {
        let mut post: ActiveModel = post.into();
        post.status = Set(PostStatus::Scheduled);
        post.ayr_post_id = Set(ayr_post_id);
        post.scheduled_at = Set(Some(scheduled_at));
        post.last_error = Set(None);
        post.updated_at = Set(chrono::Utc::now().naive_utc());
        post.update(&self.db).await
    }

    pub async fn mark_posted(
        &self,
        post: Post,
        ayr_post_id: Option<String>,
    ) -> Result<Post, DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let mut post: ActiveModel = post.into();
        post.status = Set(PostStatus::Posted);
        if ayr_post_id.is_some() {
            post.ayr_post_id = Set(ayr_post_id);
        }
        post.posted_at = Set(Some(now));
        post.last_error = Set(None);
        post.updated_at = Set(now);
        post.update(&self.db).await
    }

    pub async fn mark_failed(&self, post: Post, error: String) -> Result<Post, DbErr> {
        let mut post: ActiveModel = post.into();
        post.status = Set(PostStatus::Failed);
        post.last_error = Set(Some(error));
        post.updated_at = Set(chrono::Utc::now().naive_utc());
        post.update(&self.db).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DbErr> {
        PostEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Per-status totals for the workspace summary card.
    pub async fn status_counts(&self, workspace_id: &str) -> Result<Vec<(PostStatus, u64)>, DbErr> {
        let mut counts = Vec::new();
        for status in [
            PostStatus::Draft,
            PostStatus::Scheduled,
            PostStatus::Posted,
            PostStatus::Failed,
        ] {
            let count = PostEntity::find()
                .filter(post::Column::WorkspaceId.eq(workspace_id))
                .filter(post::Column::Status.eq(status))
                .count(&self.db)
                .await?;
            counts.push((status, count));
        }
        Ok(counts)
    }
}
