use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Canonical roles. Legacy strings (`admin`, `editor`, `client`, `view_only`)
/// are mapped onto these three by `core::permissions::normalize_role` before
/// anything is stored or resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "member")]
    Member,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }
}

/// One row links one owner to one member with a single active role.
/// The toggle columns are tri-state: NULL means "use the role default".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: String,
    pub owner_id: String,
    pub member_id: String,
    pub role: Role,
    pub can_manage_agency: Option<bool>,
    pub can_approve_posts: Option<bool>,
    pub can_final_approval: Option<bool>,
    pub joined_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::OwnerId",
        to = "super::user_profile::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::MemberId",
        to = "super::user_profile::Column::Id"
    )]
    Member,
}

impl ActiveModelBehavior for ActiveModel {}
