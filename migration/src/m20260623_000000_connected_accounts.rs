use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConnectedAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConnectedAccounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConnectedAccounts::WorkspaceId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectedAccounts::Platform)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConnectedAccounts::AccountRef)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConnectedAccounts::DisplayName).string())
                    .col(
                        ColumnDef::new(ConnectedAccounts::LinkedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ConnectedAccounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_connected_accounts_workspace")
                            .from(ConnectedAccounts::Table, ConnectedAccounts::WorkspaceId)
                            .to(Alias::new("workspaces"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // a provider account appears at most once per workspace
        manager
            .create_index(
                Index::create()
                    .name("idx_connected_accounts_unique")
                    .table(ConnectedAccounts::Table)
                    .col(ConnectedAccounts::WorkspaceId)
                    .col(ConnectedAccounts::Platform)
                    .col(ConnectedAccounts::AccountRef)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConnectedAccounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ConnectedAccounts {
    Table,
    Id,
    WorkspaceId,
    Platform,
    AccountRef,
    DisplayName,
    LinkedAt,
    IsActive,
}
