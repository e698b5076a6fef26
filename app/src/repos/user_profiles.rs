use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::{
    models::user_profile::{self, ActiveModel, Entity as UserProfileEntity, Model as UserProfile},
    utils::crypto::generate_uuid,
};

pub struct UserProfilesRepo {
    db: DatabaseConnection,
}

/// Emails are stored lowercased so lookups never depend on the casing the
/// identity provider happened to return.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserProfilesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<UserProfile, DbErr> {
        let user = UserProfileEntity::find_by_id(id).one(&self.db).await?;
        match user {
            Some(u) => Ok(u),
            None => Err(DbErr::RecordNotFound("User not found".to_string())),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<UserProfile, DbErr> {
        let user = UserProfileEntity::find()
            .filter(user_profile::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?;
        match user {
            Some(u) => Ok(u),
            None => Err(DbErr::RecordNotFound("User not found".to_string())),
        }
    }

    pub async fn create(
        &self,
        email: String,
        name: String,
        avatar_url: Option<String>,
    ) -> Result<UserProfile, DbErr> {
        let user_model = ActiveModel {
            id: Set(generate_uuid()),
            email: Set(normalize_email(&email)),
            name: Set(name),
            avatar_url: Set(avatar_url),
            created_at: Set(chrono::Utc::now().naive_utc()),
        };

        let user = user_model.insert(&self.db).await?;
        Ok(user)
    }

    /// Login entry point: returning users match on email, first-timers get a
    /// fresh profile.
    pub async fn get_or_create(
        &self,
        email: String,
        name: String,
        avatar_url: Option<String>,
    ) -> Result<UserProfile, DbErr> {
        match self.get_by_email(&email).await {
            Ok(user) => Ok(user),
            Err(DbErr::RecordNotFound(_)) => self.create(email, name, avatar_url).await,
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  John.Doe@Example.COM "),
            "john.doe@example.com"
        );
        assert_eq!(normalize_email("plain@host.io"), "plain@host.io");
    }
}
