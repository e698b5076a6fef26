use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    models::connected_account::{
        self, ActiveModel, Entity as ConnectedAccountEntity, Model as ConnectedAccount,
    },
    utils::crypto::generate_uuid,
};

pub struct ConnectedAccountsRepo {
    db: DatabaseConnection,
}

impl ConnectedAccountsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<ConnectedAccount, DbErr> {
        let account = ConnectedAccountEntity::find_by_id(id).one(&self.db).await?;
        match account {
            Some(a) => Ok(a),
            None => Err(DbErr::RecordNotFound(
                "Connected account not found".to_string(),
            )),
        }
    }

    pub async fn list_active(&self, workspace_id: &str) -> Result<Vec<ConnectedAccount>, DbErr> {
        let accounts = ConnectedAccountEntity::find()
            .filter(connected_account::Column::WorkspaceId.eq(workspace_id))
            .filter(connected_account::Column::IsActive.eq(true))
            .order_by_asc(connected_account::Column::Platform)
            .all(&self.db)
            .await?;
        Ok(accounts)
    }

    /// Mirror the provider's account list: upsert what it reports, deactivate
    /// rows it no longer mentions. Rows are kept, not deleted, so posts keep
    /// their account context in history.
    pub async fn sync(
        &self,
        workspace_id: &str,
        provider_accounts: Vec<(String, String, Option<String>)>,
    ) -> Result<Vec<ConnectedAccount>, DbErr> {
        let existing = ConnectedAccountEntity::find()
            .filter(connected_account::Column::WorkspaceId.eq(workspace_id))
            .all(&self.db)
            .await?;

        for account in &existing {
            let still_linked = provider_accounts
                .iter()
                .any(|(platform, account_ref, _)| {
                    &account.platform == platform && &account.account_ref == account_ref
                });
            if account.is_active != still_linked {
                let mut row: ActiveModel = account.clone().into();
                row.is_active = Set(still_linked);
                row.update(&self.db).await?;
            }
        }

        for (platform, account_ref, display_name) in provider_accounts {
            let known = existing
                .iter()
                .find(|a| a.platform == platform && a.account_ref == account_ref);
            match known {
                Some(account) => {
                    if account.display_name != display_name {
                        let mut row: ActiveModel = account.clone().into();
                        row.display_name = Set(display_name);
                        row.update(&self.db).await?;
                    }
                }
                None => {
                    let row = ActiveModel {
                        id: Set(generate_uuid()),
                        workspace_id: Set(workspace_id.to_string()),
                        platform: Set(platform),
                        account_ref: Set(account_ref),
                        display_name: Set(display_name),
                        linked_at: Set(chrono::Utc::now().naive_utc()),
                        is_active: Set(true),
                    };
                    row.insert(&self.db).await?;
                }
            }
        }

        self.list_active(workspace_id).await
    }

    pub async fn deactivate(&self, account: ConnectedAccount) -> Result<ConnectedAccount, DbErr> {
        let mut account: ActiveModel = account.into();
        account.is_active = Set(false);
        account.update(&self.db).await
    }
}
