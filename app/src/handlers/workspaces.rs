use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    core::permissions::Capabilities,
    core::state::AppState,
    models::team_member::Role,
    models::user_profile::Model as UserProfile,
    models::workspace::{ApprovalMode, Model as Workspace},
    repos::{team_members::TeamMembersRepo, workspaces::WorkspacesRepo},
    services::access::{profile_key, resolve_workspace_access},
    utils::{encryption, response::APIError},
};

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    pub approval_mode: Option<ApprovalMode>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub approval_mode: Option<ApprovalMode>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceWithRole {
    pub workspace: Workspace,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceDetail {
    pub workspace: Workspace,
    pub role: Role,
    pub capabilities: Capabilities,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceListResponse {
    pub workspaces: Vec<WorkspaceWithRole>,
}

#[derive(Debug, Serialize)]
pub struct DeleteWorkspaceResponse {
    pub deleted: bool,
}

/// Create a workspace and provision its posting-provider profile. Provider
/// trouble does not block creation; the workspace just cannot post until the
/// profile is repaired.
pub async fn create_workspace(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Json(payload): Json<CreateWorkspaceRequest>,
) -> Result<Json<WorkspaceDetail>, APIError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(APIError::BadRequest("Workspace name is required".to_string()));
    }

    let sealed_key = match state.ayrshare.create_profile(&name).await {
        Ok(profile) => {
            let sealed = encryption::seal(&profile.profile_key, &state.config.encryption_key)
                .map_err(|e| {
                    error!("Failed to seal profile key: {}", e);
                    APIError::InternalServerError("Failed to store workspace credentials".to_string())
                })?;
            Some(sealed)
        }
        Err(e) => {
            warn!("Provider profile creation failed for '{}': {}", name, e);
            None
        }
    };

    let approval_mode = payload.approval_mode.unwrap_or(ApprovalMode::Single);
    let workspace = WorkspacesRepo::new(state.database.clone())
        .create(user.id.clone(), name, approval_mode, sealed_key)
        .await
        .map_err(|e| {
            error!("Failed to create workspace: {}", e);
            APIError::InternalServerError("Failed to create workspace".to_string())
        })?;

    info!("Workspace {} created by {}", workspace.id, user.email);

    Ok(Json(WorkspaceDetail {
        workspace,
        role: Role::Owner,
        capabilities: Capabilities::owner(),
    }))
}

/// Workspaces the caller owns plus every workspace of each team they belong
/// to. Team membership attaches at the owner level, so one membership opens
/// all of that owner's workspaces.
pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
) -> Result<Json<WorkspaceListResponse>, APIError> {
    let workspaces_repo = WorkspacesRepo::new(state.database.clone());

    let owned = workspaces_repo.get_owned_by(&user.id).await.map_err(|e| {
        error!("Failed to list workspaces: {}", e);
        APIError::InternalServerError("Failed to list workspaces".to_string())
    })?;

    let mut entries: Vec<WorkspaceWithRole> = owned
        .into_iter()
        .map(|workspace| WorkspaceWithRole {
            workspace,
            role: Role::Owner,
        })
        .collect();

    let memberships = TeamMembersRepo::new(state.database.clone())
        .get_memberships(&user.id)
        .await
        .map_err(|e| {
            error!("Failed to list memberships: {}", e);
            APIError::InternalServerError("Failed to list workspaces".to_string())
        })?;

    for membership in memberships {
        let shared = workspaces_repo
            .get_owned_by(&membership.owner_id)
            .await
            .map_err(|e| {
                error!("Failed to list shared workspaces: {}", e);
                APIError::InternalServerError("Failed to list workspaces".to_string())
            })?;
        for workspace in shared {
            entries.push(WorkspaceWithRole {
                workspace,
                role: membership.role,
            });
        }
    }

    Ok(Json(WorkspaceListResponse { workspaces: entries }))
}

pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<WorkspaceDetail>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;

    Ok(Json(WorkspaceDetail {
        workspace: access.workspace,
        role: access.role,
        capabilities: access.caps,
    }))
}

pub async fn update_workspace(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
    Json(payload): Json<UpdateWorkspaceRequest>,
) -> Result<Json<Workspace>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_settings, "change workspace settings")?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(APIError::BadRequest("Workspace name cannot be empty".to_string()));
        }
    }

    let workspace = WorkspacesRepo::new(state.database.clone())
        .update(
            access.workspace,
            payload.name.map(|n| n.trim().to_string()),
            payload.approval_mode,
        )
        .await
        .map_err(|e| {
            error!("Failed to update workspace {}: {}", workspace_id, e);
            APIError::InternalServerError("Failed to update workspace".to_string())
        })?;

    Ok(Json(workspace))
}

/// Retry provider provisioning for a workspace created while the provider
/// was unavailable. Until this succeeds the workspace cannot post.
pub async fn provision_workspace_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<Workspace>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_settings, "manage workspace credentials")?;

    if access.workspace.ayr_profile_key.is_some() {
        return Err(APIError::Conflict(
            "This workspace already has a posting profile".to_string(),
        ));
    }

    let profile = state.ayrshare.create_profile(&access.workspace.name).await?;
    let sealed = encryption::seal(&profile.profile_key, &state.config.encryption_key)
        .map_err(|e| {
            error!("Failed to seal profile key: {}", e);
            APIError::InternalServerError("Failed to store workspace credentials".to_string())
        })?;

    let workspace = WorkspacesRepo::new(state.database.clone())
        .set_profile_key(access.workspace, Some(sealed))
        .await
        .map_err(|e| {
            error!("Failed to store profile key for {}: {}", workspace_id, e);
            APIError::InternalServerError("Failed to store workspace credentials".to_string())
        })?;

    info!("Posting profile provisioned for workspace {}", workspace_id);

    Ok(Json(workspace))
}

/// Deleting a workspace also retires its provider profile. The provider
/// call is best-effort; a dangling profile is harmless and can be cleaned
/// up from the provider dashboard.
pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<DeleteWorkspaceResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.is_owner(), "delete this workspace")?;

    if let Ok(key) = profile_key(&access.workspace, &state.config) {
        if let Err(e) = state.ayrshare.delete_profile(&key).await {
            warn!(
                "Provider profile cleanup failed for workspace {}: {}",
                workspace_id, e
            );
        }
    }

    WorkspacesRepo::new(state.database.clone())
        .delete(&workspace_id)
        .await
        .map_err(|e| {
            error!("Failed to delete workspace {}: {}", workspace_id, e);
            APIError::InternalServerError("Failed to delete workspace".to_string())
        })?;

    info!("Workspace {} deleted by {}", workspace_id, user.email);

    Ok(Json(DeleteWorkspaceResponse { deleted: true }))
}
