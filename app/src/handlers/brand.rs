use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    core::state::AppState,
    models::brand_profile::Model as BrandProfile,
    models::user_profile::Model as UserProfile,
    repos::brand_profiles::BrandProfilesRepo,
    services::access::resolve_workspace_access,
    utils::response::APIError,
};

#[derive(Debug, Deserialize)]
pub struct CreateBrandProfileRequest {
    pub name: String,
    pub tone: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBrandProfileRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub tone: Option<Option<String>>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct BrandProfileListResponse {
    pub brand_profiles: Vec<BrandProfile>,
}

#[derive(Debug, Serialize)]
pub struct DeleteBrandProfileResponse {
    pub deleted: bool,
}

async fn load_brand_profile(
    state: &AppState,
    workspace_id: &str,
    brand_id: &str,
) -> Result<BrandProfile, APIError> {
    let brand = BrandProfilesRepo::new(state.database.clone())
        .get_by_id(brand_id)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => APIError::NotFound("Brand profile not found".to_string()),
            e => {
                error!("Failed to load brand profile {}: {}", brand_id, e);
                APIError::InternalServerError("Failed to load brand profile".to_string())
            }
        })?;
    if brand.workspace_id != workspace_id {
        return Err(APIError::NotFound("Brand profile not found".to_string()));
    }
    Ok(brand)
}

pub async fn list_brand_profiles(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
) -> Result<Json<BrandProfileListResponse>, APIError> {
    resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;

    let brand_profiles = BrandProfilesRepo::new(state.database.clone())
        .list_by_workspace(&workspace_id)
        .await
        .map_err(|e| {
            error!("Failed to list brand profiles: {}", e);
            APIError::InternalServerError("Failed to list brand profiles".to_string())
        })?;

    Ok(Json(BrandProfileListResponse { brand_profiles }))
}

pub async fn get_brand_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, brand_id)): Path<(String, String)>,
) -> Result<Json<BrandProfile>, APIError> {
    resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    let brand = load_brand_profile(&state, &workspace_id, &brand_id).await?;
    Ok(Json(brand))
}

pub async fn create_brand_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path(workspace_id): Path<String>,
    Json(payload): Json<CreateBrandProfileRequest>,
) -> Result<Json<BrandProfile>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_settings, "manage brand profiles")?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(APIError::BadRequest(
            "Brand profile name is required".to_string(),
        ));
    }

    let brand = BrandProfilesRepo::new(state.database.clone())
        .create(
            workspace_id,
            name,
            payload.tone,
            payload.description,
            payload.keywords,
        )
        .await
        .map_err(|e| {
            error!("Failed to create brand profile: {}", e);
            APIError::InternalServerError("Failed to create brand profile".to_string())
        })?;

    Ok(Json(brand))
}

pub async fn update_brand_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, brand_id)): Path<(String, String)>,
    Json(payload): Json<UpdateBrandProfileRequest>,
) -> Result<Json<BrandProfile>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_settings, "manage brand profiles")?;

    let brand = load_brand_profile(&state, &workspace_id, &brand_id).await?;

    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(APIError::BadRequest(
                "Brand profile name cannot be empty".to_string(),
            ));
        }
    }

    let brand = BrandProfilesRepo::new(state.database.clone())
        .update(
            brand,
            payload.name.map(|n| n.trim().to_string()),
            payload.tone,
            payload.description,
            payload.keywords,
        )
        .await
        .map_err(|e| {
            error!("Failed to update brand profile {}: {}", brand_id, e);
            APIError::InternalServerError("Failed to update brand profile".to_string())
        })?;

    Ok(Json(brand))
}

pub async fn delete_brand_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserProfile>,
    Path((workspace_id, brand_id)): Path<(String, String)>,
) -> Result<Json<DeleteBrandProfileResponse>, APIError> {
    let access = resolve_workspace_access(&state.database, &user.id, &workspace_id).await?;
    access.require(access.caps.manage_settings, "manage brand profiles")?;

    load_brand_profile(&state, &workspace_id, &brand_id).await?;

    BrandProfilesRepo::new(state.database.clone())
        .delete(&brand_id)
        .await
        .map_err(|e| {
            error!("Failed to delete brand profile {}: {}", brand_id, e);
            APIError::InternalServerError("Failed to delete brand profile".to_string())
        })?;

    Ok(Json(DeleteBrandProfileResponse { deleted: true }))
}
