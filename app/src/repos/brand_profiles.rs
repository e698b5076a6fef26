use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde_json::json;

use crate::{
    models::brand_profile::{
        self, ActiveModel, Entity as BrandProfileEntity, Model as BrandProfile,
    },
    utils::crypto::generate_uuid,
};

pub struct BrandProfilesRepo {
    db: DatabaseConnection,
}

impl BrandProfilesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        workspace_id: String,
        name: String,
        tone: Option<String>,
        description: Option<String>,
        keywords: Vec<String>,
    ) -> Result<BrandProfile, DbErr> {
        let now = chrono::Utc::now().naive_utc();
        let profile_model = ActiveModel {
            id: Set(generate_uuid()),
            workspace_id: Set(workspace_id),
            name: Set(name),
            tone: Set(tone),
            description: Set(description),
            keywords: Set(json!(keywords)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let profile = profile_model.insert(&self.db).await?;
        Ok(profile)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<BrandProfile, DbErr> {
        let profile = BrandProfileEntity::find_by_id(id).one(&self.db).await?;
        match profile {
            Some(p) => Ok(p),
            None => Err(DbErr::RecordNotFound("Brand profile not found".to_string())),
        }
    }

    pub async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<BrandProfile>, DbErr> {
        let profiles = BrandProfileEntity::find()
            .filter(brand_profile::Column::WorkspaceId.eq(workspace_id))
            .order_by_asc(brand_profile::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(profiles)
    }

    pub async fn update(
        &self,
        profile: BrandProfile,
        name: Option<String>,
        tone: Option<Option<String>>,
        description: Option<Option<String>>,
        keywords: Option<Vec<String>>,
    ) -> Result<BrandProfile, DbErr> {
        let mut profile: ActiveModel = profile.into();
        if let Some(name) = name {
            profile.name = Set(name);
        }
        if let Some(tone) = tone {
            profile.tone = Set(tone);
        }
        if let Some(description) = description {
            profile.description = Set(description);
        }
        if let Some(keywords) = keywords {
            profile.keywords = Set(json!(keywords));
        }
        profile.updated_at = Set(chrono::Utc::now().naive_utc());
        profile.update(&self.db).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DbErr> {
        BrandProfileEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
