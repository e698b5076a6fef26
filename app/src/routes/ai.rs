use std::sync::Arc;

use axum::{routing::post, Router};

use crate::{
    core::state::AppState,
    handlers::ai::{generate_captions, generate_hashtags},
};

pub fn ai_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/captions", post(generate_captions))
        .route("/hashtags", post(generate_hashtags))
}
