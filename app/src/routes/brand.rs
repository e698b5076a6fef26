use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::brand::{
        create_brand_profile, delete_brand_profile, get_brand_profile, list_brand_profiles,
        update_brand_profile,
    },
};

pub fn brand_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_brand_profiles))
        .route("/", post(create_brand_profile))
        .route("/:brand_id", get(get_brand_profile))
        .route("/:brand_id", put(update_brand_profile))
        .route("/:brand_id", delete(delete_brand_profile))
}
