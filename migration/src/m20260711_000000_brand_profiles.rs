use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BrandProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BrandProfiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BrandProfiles::WorkspaceId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BrandProfiles::Name).string().not_null())
                    .col(ColumnDef::new(BrandProfiles::Tone).string())
                    .col(ColumnDef::new(BrandProfiles::Description).text())
                    .col(ColumnDef::new(BrandProfiles::Keywords).json().not_null())
                    .col(
                        ColumnDef::new(BrandProfiles::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BrandProfiles::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_brand_profiles_workspace")
                            .from(BrandProfiles::Table, BrandProfiles::WorkspaceId)
                            .to(Alias::new("workspaces"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_brand_profiles_workspace")
                    .table(BrandProfiles::Table)
                    .col(BrandProfiles::WorkspaceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BrandProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BrandProfiles {
    Table,
    Id,
    WorkspaceId,
    Name,
    Tone,
    Description,
    Keywords,
    CreatedAt,
    UpdatedAt,
}
