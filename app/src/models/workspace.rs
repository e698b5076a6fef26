use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How posts in this workspace get reviewed before publishing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    /// No reviewer configured, posts are implicitly approved.
    #[sea_orm(string_value = "none")]
    None,
    /// A single internal review tier.
    #[sea_orm(string_value = "single")]
    Single,
    /// Internal review, then an explicit forward to a client reviewer.
    #[sea_orm(string_value = "two_tier")]
    TwoTier,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workspaces")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// Posting-provider profile key, sealed with the server encryption key.
    #[serde(skip_serializing)]
    pub ayr_profile_key: Option<String>,
    pub approval_mode: ApprovalMode,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::OwnerId",
        to = "super::user_profile::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::connected_account::Entity")]
    ConnectedAccount,
    #[sea_orm(has_many = "super::brand_profile::Entity")]
    BrandProfile,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
