use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Delivery lifecycle of a post. The posting provider owns delivery itself;
/// `Failed` plus `last_error` is all we record when it refuses a submission.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// Review lifecycle. `None` doubles as "no reviewer configured", which the
/// publish gate treats as implicitly approved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "pending_internal")]
    PendingInternal,
    #[sea_orm(string_value = "pending_client")]
    PendingClient,
    #[sea_orm(string_value = "changes_requested")]
    ChangesRequested,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl PostStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Posted => "posted",
            Self::Failed => "failed",
        }
    }
}

impl ApprovalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::PendingInternal => "pending_internal",
            Self::PendingClient => "pending_client",
            Self::ChangesRequested => "changes_requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: String,
    pub workspace_id: String,
    pub author_id: String,
    pub content: String,
    pub platforms: Json,
    pub media_urls: Json,
    pub status: PostStatus,
    pub approval_status: ApprovalStatus,
    pub scheduled_at: Option<DateTime>,
    pub posted_at: Option<DateTime>,
    pub ayr_post_id: Option<String>,
    pub last_error: Option<String>,
    pub review_comment: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workspace::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspace::Column::Id"
    )]
    Workspace,
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::AuthorId",
        to = "super::user_profile::Column::Id"
    )]
    Author,
}

impl Related<super::workspace::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn platform_list(&self) -> Vec<String> {
        serde_json::from_value(self.platforms.clone()).unwrap_or_default()
    }

    pub fn media_url_list(&self) -> Vec<String> {
        serde_json::from_value(self.media_urls.clone()).unwrap_or_default()
    }
}
