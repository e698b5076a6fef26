use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::workspaces::{
        create_workspace, delete_workspace, get_workspace, list_workspaces,
        provision_workspace_profile, update_workspace,
    },
};

pub fn workspace_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_workspaces))
        .route("/", post(create_workspace))
        .route("/:workspace_id", get(get_workspace))
        .route("/:workspace_id", put(update_workspace))
        .route("/:workspace_id", delete(delete_workspace))
        .route(
            "/:workspace_id/provision-profile",
            post(provision_workspace_profile),
        )
}
