use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    core::invitations::{check_accept, check_cancel, check_decline, effective_status},
    core::permissions::{normalize_role, resolve, Capabilities, PermissionToggles},
    core::state::AppState,
    models::team_invitation::{InvitationStatus, Model as Invitation},
    models::team_member::{Model as TeamMember, Role},
    models::user_profile::Model as UserProfile,
    repos::{
        invitations::InvitationsRepo, team_members::TeamMembersRepo,
        user_profiles::UserProfilesRepo,
    },
    services::access::{resolve_workspace_access, WorkspaceAccess},
    utils::response::APIError,
};

#[derive(Debug, Serialize)]
pub struct MemberEntry {
    pub id: String,
    pub user: UserProfile,
    pub role: Role,
    pub can_manage_agency: Option<bool>,
    pub can_approve_posts: Option<bool>,
    pub can_final_approval: Option<bool>,
    pub capabilities: Capabilities,
    pub joined_at: String,
}

#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub members: Vec<MemberEntry>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTogglesRequest {
    /// Each field is tri-state: absent = keep, null = back to role default,
    /// true/false = explicit override.
    #[serde(default)]
    pub can_manage_agency: Option<Option<bool>>,
    #[serde(default)]
    pub can_approve_posts: Option<Option<bool>>,
    #[serde(default)]
    pub can_final_approval: Option<Option<bool>>,
}

#[derive(Debug, Serialize)]
pub struct RemoveMemberResponse {
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct InvitationListResponse {
    pub invitations: Vec<Invitation>,
}

#[derive(Debug, Serialize)]
pub struct ValidateInvitationResponse {
    pub owner_name: String,
    pub email: String,
    pub role: Role,
    pub status: InvitationStatus,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    pub membership: TeamMember,
}

fn member_entry(member: TeamMember, user: UserProfile) -> MemberEntry {
    let capabilities = resolve(member.role, PermissionToggles::from_member(&member));
    MemberEntry {
        id: member.id,
        user,
        role: member.role,
        can_manage_agency: member.can_manage_agency,
        can_approve_posts: member.can_approve_posts,
        can_final_approval: member.can_final_approval,
        capabilities,
        joined_at: member.joined_at.to_string(),
    }
}

/// Team management is open to the owner and to members the owner delegated
/// it to.
fn require_team_management(access: &WorkspaceAccess) -> Result<(), APIError> {
    access.require(
        access.caps.manage_team || access.caps.manage_agency,
        "manage the team",
    )
}

/// Load a membership row and pin it to this workspace's owner.
async fn load_member(
    state: &AppState,
    access: &WorkspaceAccess,
    member_row_id: &str,
) -> Result<TeamMember, APIError> {
    let member = TeamMembersRepo::new(state.database.clone())
        .get_by_id(member_row_id)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Team member not found".to_string()),
            e => {
                error!("Failed to load team member {}: {}", member_row_id, e);
                APIError::InternalServerError("Failed to load team member".to_string())
            }
        })?;

    if member.owner_id != access.workspace.owner_id {
        return Err(APIError::NotFound("Team member not found".to_string()));
    }
    Ok(member)
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<MemberListResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;

    let rows = TeamMembersRepo::new(state.database.clone())
        .get_by_owner_with_profiles(&access.workspace.owner_id)
        .await
        .map_err(|e| {
            error!("Failed to list team members: {}", e);
            APIError::InternalServerError("Failed to list team members".to_string())
        })?;

    let members = rows
        .into_iter()
        .map(|(member, profile)| member_entry(member, profile))
        .collect();

    Ok(Json(MemberListResponse { members }))
}

/// Role changes stay with the owner; a delegated manager may adjust toggles
/// but not promote or demote.
pub async fn update_member_role(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, member_row_id)): Path<(String, String)>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<MemberEntry>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.is_owner(), "change member roles")?;

    let role = normalize_role(&payload.role);
    if role == Role::Owner {
        return Err(APIError::BadRequest(
            "A team member cannot be made owner".to_string(),
        ));
    }

    let member = load_member(&state, &access, &member_row_id).await?;
    let member = TeamMembersRepo::new(state.database.clone())
        .update_role(member, role)
        .await
        .map_err(|e| {
            error!("Failed to update role for {}: {}", member_row_id, e);
            APIError::InternalServerError("Failed to update role".to_string())
        })?;

    let profile = UserProfilesRepo::new(state.database.clone())
        .get_by_id(&member.member_id)
        .await
        .map_err(|e| {
            error!("Failed to load member profile: {}", e);
            APIError::InternalServerError("Failed to load member profile".to_string())
        })?;

    Ok(Json(member_entry(member, profile)))
}

pub async fn update_member_toggles(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, member_row_id)): Path<(String, String)>,
    Json(payload): Json<UpdateTogglesRequest>,
) -> Result<Json<MemberEntry>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    require_team_management(&access)?;

    let member = load_member(&state, &access, &member_row_id).await?;
    let member = TeamMembersRepo::new(state.database.clone())
        .update_toggles(
            member,
            payload.can_manage_agency,
            payload.can_approve_posts,
            payload.can_final_approval,
        )
        .await
        .map_err(|e| {
            error!("Failed to update toggles for {}: {}", member_row_id, e);
            APIError::InternalServerError("Failed to update permissions".to_string())
        })?;

    let profile = UserProfilesRepo::new(state.database.clone())
        .get_by_id(&member.member_id)
        .await
        .map_err(|e| {
            error!("Failed to load member profile: {}", e);
            APIError::InternalServerError("Failed to load member profile".to_string())
        })?;

    Ok(Json(member_entry(member, profile)))
}

/// Managers remove anyone; members may remove themselves to leave the team.
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, member_row_id)): Path<(String, String)>,
) -> Result<Json<RemoveMemberResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let member = load_member(&state, &access, &member_row_id).await?;

    let leaving_self = member.member_id == user.id;
    if !leaving_self {
        require_team_management(&access)?;
    }

    TeamMembersRepo::new(state.database.clone())
        .delete(&member_row_id)
        .await
        .map_err(|e| {
            error!("Failed to remove member {}: {}", member_row_id, e);
            APIError::InternalServerError("Failed to remove member".to_string())
        })?;

    info!(
        "Member row {} removed by {} (self: {})",
        member_row_id, user.email, leaving_self
    );

    Ok(Json(RemoveMemberResponse { removed: true }))
}

pub async fn create_invitation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
    Json(payload): Json<InviteRequest>,
) -> Result<Json<Invitation>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    require_team_management(&access)?;

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(APIError::BadRequest("A valid email is required".to_string()));
    }

    let role = normalize_role(&payload.role);
    if role == Role::Owner {
        return Err(APIError::BadRequest(
            "You cannot invite someone as owner".to_string(),
        ));
    }

    let owner_id = access.workspace.owner_id.clone();

    // Already on the team?
    let users_repo = UserProfilesRepo::new(state.database.clone());
    if let Ok(existing_user) = users_repo.get_by_email(&email).await {
        let members_repo = TeamMembersRepo::new(state.database.clone());
        if members_repo
            .get_by_owner_and_member(&owner_id, &existing_user.id)
            .await
            .is_ok()
        {
            return Err(APIError::Conflict(format!(
                "{} is already on this team",
                email
            )));
        }
    }

    let invitations_repo = InvitationsRepo::new(state.database.clone());
    let duplicate = invitations_repo
        .find_pending(&owner_id, &email)
        .await
        .map_err(|e| {
            error!("Failed to check pending invitations: {}", e);
            APIError::InternalServerError("Failed to create invitation".to_string())
        })?;
    if let Some(existing) = duplicate {
        // A stale pending row does not block re-inviting.
        if effective_status(&existing, Utc::now().naive_utc()) == InvitationStatus::Pending {
            return Err(APIError::Conflict(format!(
                "{} already has a pending invitation",
                email
            )));
        }
        if let Err(e) = invitations_repo.mark_expired(existing).await {
            warn!("Failed to persist invitation expiry: {}", e);
        }
    }

    let expires_at =
        (Utc::now() + Duration::days(state.config.invite_expiry_days)).naive_utc();
    let invitation = invitations_repo
        .create(owner_id, email.clone(), role, expires_at)
        .await
        .map_err(|e| {
            error!("Failed to create invitation: {}", e);
            APIError::InternalServerError("Failed to create invitation".to_string())
        })?;

    // Email delivery is best-effort; the invite link also works from the
    // invitations list.
    let accept_url = format!(
        "{}/invitations/{}",
        state.config.app_base_url.trim_end_matches('/'),
        invitation.invite_token
    );
    if let Err(e) = state
        .mailer
        .send_invitation(
            &email,
            &user.name,
            &access.workspace.name,
            role.label(),
            &accept_url,
        )
        .await
    {
        warn!("Invitation email to {} failed: {}", email, e);
    }

    info!("Invitation {} sent to {} by {}", invitation.id, email, user.email);

    Ok(Json(invitation))
}

pub async fn list_invitations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<InvitationListResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    require_team_management(&access)?;

    let invitations_repo = InvitationsRepo::new(state.database.clone());
    let rows = invitations_repo
        .get_by_owner(&access.workspace.owner_id)
        .await
        .map_err(|e| {
            error!("Failed to list invitations: {}", e);
            APIError::InternalServerError("Failed to list invitations".to_string())
        })?;

    // Flip stale pending rows on read; there is no background sweeper.
    let now = Utc::now().naive_utc();
    let mut invitations = Vec::with_capacity(rows.len());
    for invitation in rows {
        if invitation.status == InvitationStatus::Pending
            && effective_status(&invitation, now) == InvitationStatus::Expired
        {
            match invitations_repo.mark_expired(invitation).await {
                Ok(updated) => invitations.push(updated),
                Err(e) => {
                    warn!("Failed to persist invitation expiry: {}", e);
                }
            }
        } else {
            invitations.push(invitation);
        }
    }

    Ok(Json(InvitationListResponse { invitations }))
}

pub async fn cancel_invitation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, invitation_id)): Path<(String, String)>,
) -> Result<Json<Invitation>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    require_team_management(&access)?;

    let invitations_repo = InvitationsRepo::new(state.database.clone());
    let invitation = invitations_repo
        .get_by_id(&invitation_id)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Invitation not found".to_string()),
            e => {
                error!("Failed to load invitation {}: {}", invitation_id, e);
                APIError::InternalServerError("Failed to load invitation".to_string())
            }
        })?;
    if invitation.owner_id != access.workspace.owner_id {
        return Err(APIError::NotFound("Invitation not found".to_string()));
    }

    check_cancel(&invitation, Utc::now().naive_utc())?;

    let invitation = invitations_repo
        .set_status(invitation, InvitationStatus::Cancelled)
        .await
        .map_err(|e| {
            error!("Failed to cancel invitation {}: {}", invitation_id, e);
            APIError::InternalServerError("Failed to cancel invitation".to_string())
        })?;

    Ok(Json(invitation))
}

/// Public lookup for the accept page. Reveals only what the invited person
/// needs to decide.
pub async fn validate_invitation(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ValidateInvitationResponse>, APIError> {
    let invitations_repo = InvitationsRepo::new(state.database.clone());
    let invitation = invitations_repo
        .get_by_token(&token)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Invitation not found".to_string()),
            e => {
                error!("Failed to look up invitation: {}", e);
                APIError::InternalServerError("Failed to look up invitation".to_string())
            }
        })?;

    let now = Utc::now().naive_utc();
    let status = effective_status(&invitation, now);
    let invitation = if status == InvitationStatus::Expired
        && invitation.status == InvitationStatus::Pending
    {
        match invitations_repo.mark_expired(invitation.clone()).await {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Failed to persist invitation expiry: {}", e);
                invitation
            }
        }
    } else {
        invitation
    };

    let owner = UserProfilesRepo::new(state.database.clone())
        .get_by_id(&invitation.owner_id)
        .await
        .map_err(|e| {
            error!("Failed to load inviter profile: {}", e);
            APIError::InternalServerError("Failed to look up invitation".to_string())
        })?;

    Ok(Json(ValidateInvitationResponse {
        owner_name: owner.name,
        email: invitation.email,
        role: invitation.role,
        status,
        expires_at: invitation.expires_at.to_string(),
    }))
}

pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(token): Path<String>,
) -> Result<Json<AcceptInvitationResponse>, APIError> {
    let invitations_repo = InvitationsRepo::new(state.database.clone());
    let invitation = invitations_repo
        .get_by_token(&token)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Invitation not found".to_string()),
            e => {
                error!("Failed to look up invitation: {}", e);
                APIError::InternalServerError("Failed to look up invitation".to_string())
            }
        })?;

    let now = Utc::now().naive_utc();
    if let Err(refusal) = check_accept(&invitation, &user.id, &user.email, now) {
        // Persist the expiry flip the check just observed.
        if invitation.status == InvitationStatus::Pending
            && effective_status(&invitation, now) == InvitationStatus::Expired
        {
            if let Err(e) = invitations_repo.mark_expired(invitation).await {
                warn!("Failed to persist invitation expiry: {}", e);
            }
        }
        return Err(refusal.into());
    }

    let members_repo = TeamMembersRepo::new(state.database.clone());

    // Accepting twice (or being added manually in the meantime) keeps the
    // existing membership rather than erroring the accept page.
    let membership = match members_repo
        .get_by_owner_and_member(&invitation.owner_id, &user.id)
        .await
    {
        Ok(existing) => existing,
        Err(DbErr::RecordNotFound(_)) => members_repo
            .create(invitation.owner_id.clone(), user.id.clone(), invitation.role)
            .await
            .map_err(|e| {
                error!("Failed to create membership: {}", e);
                APIError::InternalServerError("Failed to join the team".to_string())
            })?,
        Err(e) => {
            error!("Failed to check membership: {}", e);
            return Err(APIError::InternalServerError(
                "Failed to join the team".to_string(),
            ));
        }
    };

    invitations_repo
        .set_status(invitation, InvitationStatus::Accepted)
        .await
        .map_err(|e| {
            error!("Failed to mark invitation accepted: {}", e);
            APIError::InternalServerError("Failed to join the team".to_string())
        })?;

    info!("{} joined team of owner {}", user.email, membership.owner_id);

    Ok(Json(AcceptInvitationResponse { membership }))
}

pub async fn decline_invitation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(token): Path<String>,
) -> Result<Json<Invitation>, APIError> {
    let invitations_repo = InvitationsRepo::new(state.database.clone());
    let invitation = invitations_repo
        .get_by_token(&token)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Invitation not found".to_string()),
            e => {
                error!("Failed to look up invitation: {}", e);
                APIError::InternalServerError("Failed to look up invitation".to_string())
            }
        })?;

    check_decline(&invitation, &user.email, Utc::now().naive_utc())?;

    let invitation = invitations_repo
        .set_status(invitation, InvitationStatus::Rejected)
        .await
        .map_err(|e| {
            error!("Failed to decline invitation: {}", e);
            APIError::InternalServerError("Failed to decline invitation".to_string())
        })?;

    Ok(Json(invitation))
}
