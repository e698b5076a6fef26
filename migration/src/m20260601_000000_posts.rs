use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Posts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Posts::WorkspaceId).string().not_null())
                    .col(ColumnDef::new(Posts::AuthorId).string().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::Platforms).json().not_null())
                    .col(ColumnDef::new(Posts::MediaUrls).json().not_null())
                    .col(
                        ColumnDef::new(Posts::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Posts::ApprovalStatus)
                            .string()
                            .not_null()
                            .default("none"),
                    )
                    .col(ColumnDef::new(Posts::ScheduledAt).timestamp())
                    .col(ColumnDef::new(Posts::PostedAt).timestamp())
                    .col(ColumnDef::new(Posts::AyrPostId).string())
                    .col(ColumnDef::new(Posts::LastError).text())
                    .col(ColumnDef::new(Posts::ReviewComment).text())
                    .col(ColumnDef::new(Posts::ReviewedBy).string())
                    .col(ColumnDef::new(Posts::ReviewedAt).timestamp())
                    .col(
                        ColumnDef::new(Posts::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Posts::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_workspace")
                            .from(Posts::Table, Posts::WorkspaceId)
                            .to(Alias::new("workspaces"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_author")
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Alias::new("user_profiles"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_workspace_created")
                    .table(Posts::Table)
                    .col(Posts::WorkspaceId)
                    .col(Posts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_approval_status")
                    .table(Posts::Table)
                    .col(Posts::WorkspaceId)
                    .col(Posts::ApprovalStatus)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
    WorkspaceId,
    AuthorId,
    Content,
    Platforms,
    MediaUrls,
    Status,
    ApprovalStatus,
    ScheduledAt,
    PostedAt,
    AyrPostId,
    LastError,
    ReviewComment,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}
