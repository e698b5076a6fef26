use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::accounts::{
        cancel_link_session, list_accounts, open_link_session, poll_link_session,
        refresh_accounts, unlink_account,
    },
};

pub fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/refresh", post(refresh_accounts))
        .route("/:account_id", delete(unlink_account))
        // Backend-owned linking flow
        .route("/link-sessions", post(open_link_session))
        .route("/link-sessions/:session_id", get(poll_link_session))
        .route("/link-sessions/:session_id/cancel", post(cancel_link_session))
}
