use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{
    core::state::AppState,
    handlers::inbox::{platform_messages, post_comments},
};

pub fn inbox_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/comments/:post_id", get(post_comments))
        .route("/messages/:platform", get(platform_messages))
}
