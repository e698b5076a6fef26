use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    models::team_member::{self, ActiveModel, Entity as TeamMemberEntity, Model as TeamMember, Role},
    models::user_profile::{Entity as UserProfileEntity, Model as UserProfile},
    utils::crypto::generate_uuid,
};

pub struct TeamMembersRepo {
    db: DatabaseConnection,
}

impl TeamMembersRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        owner_id: String,
        member_id: String,
        role: Role,
    ) -> Result<TeamMember, DbErr> {
        let member_model = ActiveModel {
            id: Set(generate_uuid()),
            owner_id: Set(owner_id),
            member_id: Set(member_id),
            role: Set(role),
            can_manage_agency: Set(None),
            can_approve_posts: Set(None),
            can_final_approval: Set(None),
            joined_at: Set(chrono::Utc::now().naive_utc()),
        };

        let member = member_model.insert(&self.db).await?;
        Ok(member)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<TeamMember, DbErr> {
        let member = TeamMemberEntity::find_by_id(id).one(&self.db).await?;
        match member {
            Some(m) => Ok(m),
            None => Err(DbErr::RecordNotFound("Team member not found".to_string())),
        }
    }

    pub async fn get_by_owner_and_member(
        &self,
        owner_id: &str,
        member_id: &str,
    ) -> Result<TeamMember, DbErr> {
        let member = TeamMemberEntity::find()
            .filter(team_member::Column::OwnerId.eq(owner_id))
            .filter(team_member::Column::MemberId.eq(member_id))
            .one(&self.db)
            .await?;
        match member {
            Some(m) => Ok(m),
            None => Err(DbErr::RecordNotFound("Team member not found".to_string())),
        }
    }

    /// Rows with the joined profile, for the members listing.
    pub async fn get_by_owner_with_profiles(
        &self,
        owner_id: &str,
    ) -> Result<Vec<(TeamMember, UserProfile)>, DbErr> {
        let members = TeamMemberEntity::find()
            .filter(team_member::Column::OwnerId.eq(owner_id))
            .order_by_asc(team_member::Column::JoinedAt)
            .all(&self.db)
            .await?;

        let mut results = Vec::new();
        for member in members {
            if let Some(profile) = UserProfileEntity::find_by_id(&member.member_id)
                .one(&self.db)
                .await?
            {
                results.push((member, profile));
            }
        }
        Ok(results)
    }

    /// Teams this user belongs to, across all owners.
    pub async fn get_memberships(&self, member_id: &str) -> Result<Vec<TeamMember>, DbErr> {
        let memberships = TeamMemberEntity::find()
            .filter(team_member::Column::MemberId.eq(member_id))
            .all(&self.db)
            .await?;
        Ok(memberships)
    }

    pub async fn update_role(&self, member: TeamMember, role: Role) -> Result<TeamMember, DbErr> {
        let mut member: ActiveModel = member.into();
        member.role = Set(role);
        member.update(&self.db).await
    }

    pub async fn update_toggles(
        &self,
        member: TeamMember,
        can_manage_agency: Option<Option<bool>>,
        can_approve_posts: Option<Option<bool>>,
        can_final_approval: Option<Option<bool>>,
    ) -> Result<TeamMember, DbErr> {
        let mut member: ActiveModel = member.into();
        if let Some(v) = can_manage_agency {
            member.can_manage_agency = Set(v);
        }
        if let Some(v) = can_approve_posts {
            member.can_approve_posts = Set(v);
        }
        if let Some(v) = can_final_approval {
            member.can_final_approval = Set(v);
        }
        member.update(&self.db).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DbErr> {
        TeamMemberEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
