use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::posts::{
        create_post, delete_post, get_post, list_posts, publish_post, refresh_post_status,
        retry_post, submit_post, update_post,
    },
};

pub fn post_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_posts))
        .route("/", post(create_post))
        .route("/:post_id", get(get_post))
        .route("/:post_id", put(update_post))
        .route("/:post_id", delete(delete_post))
        // Lifecycle actions
        .route("/:post_id/submit", post(submit_post))
        .route("/:post_id/publish", post(publish_post))
        .route("/:post_id/retry", post(retry_post))
        .route("/:post_id/refresh", post(refresh_post_status))
}
