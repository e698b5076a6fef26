use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::team::{
        accept_invitation, cancel_invitation, create_invitation, decline_invitation,
        list_invitations, list_members, remove_member, update_member_role, update_member_toggles,
        validate_invitation,
    },
};

pub fn team_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/members", get(list_members))
        .route("/members/:member_id/role", put(update_member_role))
        .route("/members/:member_id/permissions", put(update_member_toggles))
        .route("/members/:member_id", delete(remove_member))
        .route("/invitations", get(list_invitations))
        .route("/invitations", post(create_invitation))
        .route("/invitations/:invitation_id", delete(cancel_invitation))
}

/// Token-addressed invitation actions. The invited person acts on these
/// before they belong to any workspace, so they live outside the
/// workspace-scoped tree.
pub fn invitation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/:token/accept", post(accept_invitation))
        .route("/:token/decline", post(decline_invitation))
}

/// The one read anyone holding the token may perform without signing in.
pub fn public_invitation_routes() -> Router<Arc<AppState>> {
    Router::new().route("/:token", get(validate_invitation))
}
