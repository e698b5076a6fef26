use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    models::workspace::{self, ActiveModel, ApprovalMode, Entity as WorkspaceEntity, Model as Workspace},
    utils::crypto::generate_uuid,
};

pub struct WorkspacesRepo {
    db: DatabaseConnection,
}

impl WorkspacesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// `ayr_profile_key` arrives already sealed; this layer never sees the
    /// plaintext key.
    pub async fn create(
        &self,
        owner_id: String,
        name: String,
        approval_mode: ApprovalMode,
        ayr_profile_key: Option<String>,
    ) -> Result<Workspace, DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let workspace_model = ActiveModel {
            id: Set(generate_uuid()),
            owner_id: Set(owner_id),
            name: Set(name),
            ayr_profile_key: Set(ayr_profile_key),
            approval_mode: Set(approval_mode),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let workspace = workspace_model.insert(&self.db).await?;
        Ok(workspace)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Workspace, DbErr> {
        let workspace = WorkspaceEntity::find_by_id(id).one(&self.db).await?;
        match workspace {
            Some(w) => Ok(w),
            None => Err(DbErr::RecordNotFound("Workspace not found".to_string())),
        }
    }

    pub async fn get_owned_by(&self, owner_id: &str) -> Result<Vec<Workspace>, DbErr> {
        let workspaces = WorkspaceEntity::find()
            .filter(workspace::Column::OwnerId.eq(owner_id))
            .order_by_asc(workspace::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(workspaces)
    }

    pub async fn update(
        &self,
        workspace: Workspace,
        name: Option<String>,
        approval_mode: Option<ApprovalMode>,
    ) -> Result<Workspace, DbErr> {
        let mut workspace: ActiveModel = workspace.into();
        if let Some(name) = name {
            workspace.name = Set(name);
        }
        if let Some(mode) = approval_mode {
            workspace.approval_mode = Set(mode);
        }
        workspace.updated_at = Set(chrono::Utc::now().naive_utc());
        workspace.update(&self.db).await
    }

    pub async fn set_profile_key(
        &self,
        workspace: Workspace,
        sealed_key: Option<String>,
    ) -> Result<Workspace, DbErr> {
        let mut workspace: ActiveModel = workspace.into();
        workspace.ayr_profile_key = Set(sealed_key);
        workspace.updated_at = Set(chrono::Utc::now().naive_utc());
        workspace.update(&self.db).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DbErr> {
        WorkspaceEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
