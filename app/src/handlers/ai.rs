use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    core::state::AppState,
    models::user_profile::Model as UserProfile,
    repos::brand_profiles::BrandProfilesRepo,
    services::access::resolve_workspace_access,
    services::openai::CaptionBrief,
    utils::response::APIError,
};

#[derive(Debug, Deserialize)]
pub struct CaptionRequest {
    pub topic: String,
    pub platform: Option<String>,
    pub tone: Option<String>,
    pub brand_profile_id: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct HashtagRequest {
    pub content: String,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub captions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HashtagResponse {
    pub hashtags: Vec<String>,
}

/// Caption options for the composer. A selected brand profile contributes
/// tone and keywords unless the request overrides them.
pub async fn generate_captions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
    Json(payload): Json<CaptionRequest>,
) -> Result<Json<CaptionResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.create_posts, "use caption generation")?;

    if payload.topic.trim().is_empty() {
        return Err(APIError::BadRequest("A topic is required".to_string()));
    }

    let mut tone = payload.tone;
    let mut keywords = Vec::new();
    if let Some(brand_id) = &payload.brand_profile_id {
        let brand = BrandProfilesRepo::new(state.database.clone())
            .get_by_id(brand_id)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotFound(_) => {
                    APIError::NotFound("Brand profile not found".to_string())
                }
                e => {
                    error!("Failed to load brand profile {}: {}", brand_id, e);
                    APIError::InternalServerError("Failed to load brand profile".to_string())
                }
            })?;
        if brand.workspace_id != workspace_id {
            return Err(APIError::NotFound("Brand profile not found".to_string()));
        }
        if tone.is_none() {
            tone = brand.tone.clone();
        }
        keywords = brand.keyword_list();
    }

    let brief = CaptionBrief {
        topic: payload.topic,
        platform: payload.platform,
        tone,
        keywords,
        count: payload.count.unwrap_or(3).clamp(1, 10),
    };

    let captions = state.openai.generate_captions(&brief).await?;
    Ok(Json(CaptionResponse { captions }))
}

pub async fn generate_hashtags(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
    Json(payload): Json<HashtagRequest>,
) -> Result<Json<HashtagResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.create_posts, "use hashtag generation")?;

    if payload.content.trim().is_empty() {
        return Err(APIError::BadRequest("Post content is required".to_string()));
    }

    let count = payload.count.unwrap_or(10).clamp(1, 30);
    let hashtags = state.openai.generate_hashtags(&payload.content, count).await?;
    Ok(Json(HashtagResponse { hashtags }))
}
