use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfiles::Email).string().not_null())
                    .col(ColumnDef::new(UserProfiles::Name).string().not_null())
                    .col(ColumnDef::new(UserProfiles::AvatarUrl).string())
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_profiles_email")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Workspaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workspaces::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workspaces::OwnerId).string().not_null())
                    .col(ColumnDef::new(Workspaces::Name).string().not_null())
                    .col(ColumnDef::new(Workspaces::AyrProfileKey).string())
                    .col(
                        ColumnDef::new(Workspaces::ApprovalMode)
                            .string()
                            .not_null()
                            .default("single"),
                    )
                    .col(
                        ColumnDef::new(Workspaces::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Workspaces::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspaces_owner")
                            .from(Workspaces::Table, Workspaces::OwnerId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMembers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamMembers::OwnerId).string().not_null())
                    .col(ColumnDef::new(TeamMembers::MemberId).string().not_null())
                    .col(ColumnDef::new(TeamMembers::Role).string().not_null())
                    .col(ColumnDef::new(TeamMembers::CanManageAgency).boolean())
                    .col(ColumnDef::new(TeamMembers::CanApprovePosts).boolean())
                    .col(ColumnDef::new(TeamMembers::CanFinalApproval).boolean())
                    .col(
                        ColumnDef::new(TeamMembers::JoinedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_owner")
                            .from(TeamMembers::Table, TeamMembers::OwnerId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_member")
                            .from(TeamMembers::Table, TeamMembers::MemberId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one active role per owner/member pair
        manager
            .create_index(
                Index::create()
                    .name("idx_team_members_owner_member")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::OwnerId)
                    .col(TeamMembers::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamInvitations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamInvitations::OwnerId).string().not_null())
                    .col(ColumnDef::new(TeamInvitations::Email).string().not_null())
                    .col(ColumnDef::new(TeamInvitations::Role).string().not_null())
                    .col(
                        ColumnDef::new(TeamInvitations::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(TeamInvitations::InviteToken)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamInvitations::ExpiresAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamInvitations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(TeamInvitations::RespondedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_invitations_owner")
                            .from(TeamInvitations::Table, TeamInvitations::OwnerId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_invitations_token")
                    .table(TeamInvitations::Table)
                    .col(TeamInvitations::InviteToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_invitations_owner_email")
                    .table(TeamInvitations::Table)
                    .col(TeamInvitations::OwnerId)
                    .col(TeamInvitations::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamInvitations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workspaces::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum UserProfiles {
    Table,
    Id,
    Email,
    Name,
    AvatarUrl,
    CreatedAt,
}

#[derive(Iden)]
enum Workspaces {
    Table,
    Id,
    OwnerId,
    Name,
    AyrProfileKey,
    ApprovalMode,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TeamMembers {
    Table,
    Id,
    OwnerId,
    MemberId,
    Role,
    CanManageAgency,
    CanApprovePosts,
    CanFinalApproval,
    JoinedAt,
}

#[derive(Iden)]
enum TeamInvitations {
    Table,
    Id,
    OwnerId,
    Email,
    Role,
    Status,
    InviteToken,
    RespondedAt,
    ExpiresAt,
    CreatedAt,
}
