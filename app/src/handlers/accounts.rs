use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    core::linking::{LinkSession, LinkSessionStatus},
    core::state::AppState,
    models::connected_account::Model as ConnectedAccount,
    models::user_profile::Model as UserProfile,
    repos::connected_accounts::ConnectedAccountsRepo,
    services::access::{profile_key, resolve_workspace_access},
    services::ayrshare::SocialAccount,
    utils::response::APIError,
};

#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    pub accounts: Vec<ConnectedAccount>,
}

#[derive(Debug, Serialize)]
pub struct LinkSessionResponse {
    pub session: LinkSession,
    pub new_accounts: Vec<ConnectedAccount>,
}

/// Stable identity for a provider account. The provider does not always
/// return a numeric id, so fall back to username, then platform.
fn account_ref(account: &SocialAccount) -> String {
    account
        .id
        .clone()
        .or_else(|| account.username.clone())
        .unwrap_or_else(|| account.platform.clone())
}

fn baseline_key(platform: &str, account_ref: &str) -> String {
    format!("{}:{}", platform, account_ref)
}

fn to_sync_rows(accounts: Vec<SocialAccount>) -> Vec<(String, String, Option<String>)> {
    accounts
        .into_iter()
        .map(|account| {
            let r = account_ref(&account);
            (account.platform, r, account.display_name)
        })
        .collect()
}

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<AccountListResponse>, APIError> {
    resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;

    let accounts = ConnectedAccountsRepo::new(state.database.clone())
        .list_active(&workspace_id)
        .await
        .map_err(|e| {
            error!("Failed to list connected accounts: {}", e);
            APIError::InternalServerError("Failed to list connected accounts".to_string())
        })?;

    Ok(Json(AccountListResponse { accounts }))
}

/// Re-pull the provider's account list and mirror it locally.
pub async fn refresh_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<AccountListResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_accounts, "manage connected accounts")?;

    let key = profile_key(&access.workspace, &state.config)?;
    let provider_accounts = state.ayrshare.connected_accounts(&key).await?;

    let accounts = ConnectedAccountsRepo::new(state.database.clone())
        .sync(&workspace_id, to_sync_rows(provider_accounts))
        .await
        .map_err(|e| {
            error!("Failed to sync connected accounts: {}", e);
            APIError::InternalServerError("Failed to sync connected accounts".to_string())
        })?;

    Ok(Json(AccountListResponse { accounts }))
}

/// Unlink on the provider first; only a confirmed unlink deactivates the row.
pub async fn unlink_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, account_id)): Path<(String, String)>,
) -> Result<Json<ConnectedAccount>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_accounts, "manage connected accounts")?;

    let accounts_repo = ConnectedAccountsRepo::new(state.database.clone());
    let account = accounts_repo
        .get_by_id(&account_id)
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => {
                APIError::NotFound("Connected account not found".to_string())
            }
            e => {
                error!("Failed to load account {}: {}", account_id, e);
                APIError::InternalServerError("Failed to load connected account".to_string())
            }
        })?;
    if account.workspace_id != workspace_id {
        return Err(APIError::NotFound("Connected account not found".to_string()));
    }

    let key = profile_key(&access.workspace, &state.config)?;
    state.ayrshare.unlink_social(&key, &account.platform).await?;

    let account = accounts_repo.deactivate(account).await.map_err(|e| {
        error!("Failed to deactivate account {}: {}", account_id, e);
        APIError::InternalServerError("Failed to unlink account".to_string())
    })?;

    info!(
        "Account {} ({}) unlinked by {}",
        account_id, account.platform, user.email
    );

    Ok(Json(account))
}

/// Open a linking session: ask the provider for its hosted link page and
/// remember which accounts existed beforehand so completion can tell what
/// is new.
pub async fn open_link_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<LinkSessionResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_accounts, "manage connected accounts")?;

    let key = profile_key(&access.workspace, &state.config)?;
    let url = state.ayrshare.generate_link_url(&key).await?;

    let baseline = state
        .ayrshare
        .connected_accounts(&key)
        .await?
        .iter()
        .map(|a| baseline_key(&a.platform, &account_ref(a)))
        .collect();

    let session = state
        .link_sessions
        .open(
            &workspace_id,
            url,
            baseline,
            state.config.link_session_ttl_secs,
        )
        .await;

    Ok(Json(LinkSessionResponse {
        session,
        new_accounts: Vec::new(),
    }))
}

/// Poll a linking session. While pending we check the provider for accounts
/// that were not in the baseline; the first new one completes the session.
pub async fn poll_link_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, session_id)): Path<(String, String)>,
) -> Result<Json<LinkSessionResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_accounts, "manage connected accounts")?;

    let session = state
        .link_sessions
        .get(&session_id)
        .await
        .ok_or_else(|| APIError::NotFound("Link session not found".to_string()))?;
    if session.workspace_id != workspace_id {
        return Err(APIError::NotFound("Link session not found".to_string()));
    }

    if session.status != LinkSessionStatus::Pending {
        return Ok(Json(LinkSessionResponse {
            session,
            new_accounts: Vec::new(),
        }));
    }

    let key = profile_key(&access.workspace, &state.config)?;
    let provider_accounts = match state.ayrshare.connected_accounts(&key).await {
        Ok(accounts) => accounts,
        Err(e) => {
            // Transient provider trouble must not kill the session; the
            // client will poll again.
            warn!("Account poll failed for session {}: {}", session_id, e);
            return Ok(Json(LinkSessionResponse {
                session,
                new_accounts: Vec::new(),
            }));
        }
    };

    let appeared = provider_accounts
        .iter()
        .any(|a| !session.baseline.contains(&baseline_key(&a.platform, &account_ref(a))));

    if !appeared {
        return Ok(Json(LinkSessionResponse {
            session,
            new_accounts: Vec::new(),
        }));
    }

    let baseline = session.baseline.clone();
    let session = state
        .link_sessions
        .complete(&session_id)
        .await
        .ok_or_else(|| APIError::NotFound("Link session not found".to_string()))?;

    let accounts = ConnectedAccountsRepo::new(state.database.clone())
        .sync(&workspace_id, to_sync_rows(provider_accounts))
        .await
        .map_err(|e| {
            error!("Failed to sync connected accounts: {}", e);
            APIError::InternalServerError("Failed to sync connected accounts".to_string())
        })?;

    let new_accounts = accounts
        .into_iter()
        .filter(|a| !baseline.contains(&baseline_key(&a.platform, &a.account_ref)))
        .collect();

    info!("Link session {} completed by {}", session_id, user.email);

    Ok(Json(LinkSessionResponse {
        session,
        new_accounts,
    }))
}

pub async fn cancel_link_session(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, session_id)): Path<(String, String)>,
) -> Result<Json<LinkSessionResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_accounts, "manage connected accounts")?;

    let session = state
        .link_sessions
        .cancel(&session_id)
        .await
        .ok_or_else(|| APIError::NotFound("Link session not found".to_string()))?;
    if session.workspace_id != workspace_id {
        return Err(APIError::NotFound("Link session not found".to_string()));
    }

    Ok(Json(LinkSessionResponse {
        session,
        new_accounts: Vec::new(),
    }))
}
