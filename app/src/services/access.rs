use sea_orm::{DatabaseConnection, DbErr};
use tracing::error;

use crate::{
    config::config::Config,
    core::permissions::{resolve, Capabilities, PermissionToggles},
    models::team_member::Role,
    models::workspace::Model as Workspace,
    repos::{team_members::TeamMembersRepo, workspaces::WorkspacesRepo},
    utils::{encryption, response::APIError},
};

/// The caller's standing inside one workspace, resolved once per request.
pub struct WorkspaceAccess {
    pub workspace: Workspace,
    pub role: Role,
    pub caps: Capabilities,
}

impl WorkspaceAccess {
    pub fn require(&self, allowed: bool, action: &str) -> Result<(), APIError> {
        if allowed {
            Ok(())
        } else {
            Err(APIError::Forbidden(format!(
                "You are not allowed to {} in this workspace",
                action
            )))
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

/// Look up the workspace and the caller's role in it. Outsiders get the same
/// 404 as a missing workspace so ids cannot be probed.
pub async fn resolve_workspace_access(
    db: &DatabaseConnection,
    user_id: &str,
    workspace_id: &str,
) -> Result<WorkspaceAccess, APIError> {
    let workspace = WorkspacesRepo::new(db.clone())
        .get_by_id(workspace_id)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Workspace not found".to_string()),
            e => {
                error!("Failed to load workspace {}: {}", workspace_id, e);
                APIError::InternalServerError("Failed to load workspace".to_string())
            }
        })?;

    if workspace.owner_id == user_id {
        return Ok(WorkspaceAccess {
            workspace,
            role: Role::Owner,
            caps: Capabilities::owner(),
        });
    }

    let membership = TeamMembersRepo::new(db.clone())
        .get_by_owner_and_member(&workspace.owner_id, user_id)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Workspace not found".to_string()),
            e => {
                error!("Failed to load membership for {}: {}", workspace_id, e);
                APIError::InternalServerError("Failed to load workspace".to_string())
            }
        })?;

    let caps = resolve(membership.role, PermissionToggles::from_member(&membership));
    Ok(WorkspaceAccess {
        workspace,
        role: membership.role,
        caps,
    })
}

/// Unseal the workspace's posting-provider key. Workspaces whose provider
/// provisioning failed have none and cannot post until it is repaired.
pub fn profile_key(workspace: &Workspace, config: &Config) -> Result<String, APIError> {
    let sealed = workspace.ayr_profile_key.as_deref().ok_or_else(|| {
        APIError::BadRequest("This workspace has no posting profile".to_string())
    })?;

    encryption::open(sealed, &config.encryption_key).map_err(|e| {
        error!(
            "Failed to unseal profile key for workspace {}: {}",
            workspace.id, e
        );
        APIError::InternalServerError("Failed to read workspace credentials".to_string())
    })
}
