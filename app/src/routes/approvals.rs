use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::approvals::{approve_post, forward_post, list_pending, reject_post, request_changes},
};

pub fn approval_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_pending))
        .route("/:post_id/approve", post(approve_post))
        .route("/:post_id/forward", post(forward_post))
        .route("/:post_id/request-changes", post(request_changes))
        .route("/:post_id/reject", post(reject_post))
}
