use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    models::team_invitation::{
        self, ActiveModel, Entity as InvitationEntity, InvitationStatus, Model as Invitation,
    },
    models::team_member::Role,
    utils::crypto::{generate_invite_token, generate_uuid},
};

pub struct InvitationsRepo {
    db: DatabaseConnection,
}

impl InvitationsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        owner_id: String,
        email: String,
        role: Role,
        expires_at: chrono::NaiveDateTime,
    ) -> Result<Invitation, DbErr> {
        let invitation_model = ActiveModel {
            id: Set(generate_uuid()),
            owner_id: Set(owner_id),
            email: Set(email),
            role: Set(role),
            status: Set(InvitationStatus::Pending),
            invite_token: Set(generate_invite_token()),
            expires_at: Set(expires_at),
            created_at: Set(chrono::Utc::now().naive_utc()),
            responded_at: Set(None),
        };

        let invitation = invitation_model.insert(&self.db).await?;
        Ok(invitation)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Invitation, DbErr> {
        let invitation = InvitationEntity::find_by_id(id).one(&self.db).await?;
        match invitation {
            Some(i) => Ok(i),
            None => Err(DbErr::RecordNotFound("Invitation not found".to_string())),
        }
    }

    pub async fn get_by_token(&self, token: &str) -> Result<Invitation, DbErr> {
        let invitation = InvitationEntity::find()
            .filter(team_invitation::Column::InviteToken.eq(token))
            .one(&self.db)
            .await?;
        match invitation {
            Some(i) => Ok(i),
            None => Err(DbErr::RecordNotFound("Invitation not found".to_string())),
        }
    }

    pub async fn get_by_owner(&self, owner_id: &str) -> Result<Vec<Invitation>, DbErr> {
        let invitations = InvitationEntity::find()
            .filter(team_invitation::Column::OwnerId.eq(owner_id))
            .order_by_desc(team_invitation::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(invitations)
    }

    /// Duplicate guard: one open invitation per (owner, address) at a time.
    pub async fn find_pending(
        &self,
        owner_id: &str,
        email: &str,
    ) -> Result<Option<Invitation>, DbErr> {
        let invitation = InvitationEntity::find()
            .filter(team_invitation::Column::OwnerId.eq(owner_id))
            .filter(team_invitation::Column::Email.eq(email))
            .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
            .one(&self.db)
            .await?;
        Ok(invitation)
    }

    pub async fn set_status(
        &self,
        invitation: Invitation,
        status: InvitationStatus,
    ) -> Result<Invitation, DbErr> {
        let mut invitation: ActiveModel = invitation.into();
        invitation.status = Set(status);
        invitation.responded_at = Set(Some(chrono::Utc::now().naive_utc()));
        invitation.update(&self.db).await
    }

    /// Persist a lazy expiry flip. No responded_at: nobody responded.
    pub async fn mark_expired(&self, invitation: Invitation) -> Result<Invitation, DbErr> {
        let mut invitation: ActiveModel = invitation.into();
        invitation.status = Set(InvitationStatus::Expired);
        invitation.update(&self.db).await
    }
}
