use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{
    core::state::AppState,
    handlers::analytics::{post_analytics, workspace_summary},
};

pub fn analytics_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/summary", get(workspace_summary))
        .route("/posts/:post_id", get(post_analytics))
}
