use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::Permission;
use roofline_domain::pagination::PageRequest;

use crate::domain::repository::{AccountAdminRepository, ActivityLogRepository, AdminRepository};
use crate::domain::types::{AccountFilter, AccountRecord, Action, ActivityEntry, EntityKind};
use crate::error::AdminError;
use crate::usecase::access::{authorize, record};

async fn load_account<R: AccountAdminRepository>(
    accounts: &R,
    id: Uuid,
) -> Result<AccountRecord, AdminError> {
    accounts
        .find_by_id(id)
        .await?
        .ok_or(AdminError::AccountNotFound)
}

pub struct ListAccountsUseCase<A: AdminRepository, R: AccountAdminRepository> {
    pub admins: A,
    pub accounts: R,
}

impl<A: AdminRepository, R: AccountAdminRepository> ListAccountsUseCase<A, R> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        filter: AccountFilter,
        page: PageRequest,
    ) -> Result<Vec<AccountRecord>, AdminError> {
        authorize(&self.admins, identity, Permission::ManageUsers).await?;
        self.accounts.list(&filter, page).await
    }
}

pub struct GetAccountUseCase<A: AdminRepository, R: AccountAdminRepository> {
    pub admins: A,
    pub accounts: R,
}

impl<A: AdminRepository, R: AccountAdminRepository> GetAccountUseCase<A, R> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        id: Uuid,
    ) -> Result<AccountRecord, AdminError> {
        authorize(&self.admins, identity, Permission::ManageUsers).await?;
        load_account(&self.accounts, id).await
    }
}

pub struct SetAccountStatusUseCase<A, R, L>
where
    A: AdminRepository,
    R: AccountAdminRepository,
    L: ActivityLogRepository,
{
    pub admins: A,
    pub accounts: R,
    pub log: L,
}

impl<A, R, L> SetAccountStatusUseCase<A, R, L>
where
    A: AdminRepository,
    R: AccountAdminRepository,
    L: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        id: Uuid,
        active: bool,
    ) -> Result<AccountRecord, AdminError> {
        let actor = authorize(&self.admins, identity, Permission::ManageUsers).await?;
        let account = load_account(&self.accounts, id).await?;
        self.accounts.set_active(id, active).await?;
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::UpdateAccountStatus,
                EntityKind::Account,
                Some(id),
                json!({ "role": account.role, "isActive": active }),
            ),
        )
        .await?;
        Ok(AccountRecord {
            is_active: active,
            updated_at: Utc::now(),
            ..account
        })
    }
}

/// Deactivates by default; `hard` removes the account row and its listings.
pub struct DeleteAccountUseCase<A, R, L>
where
    A: AdminRepository,
    R: AccountAdminRepository,
    L: ActivityLogRepository,
{
    pub admins: A,
    pub accounts: R,
    pub log: L,
}

impl<A, R, L> DeleteAccountUseCase<A, R, L>
where
    A: AdminRepository,
    R: AccountAdminRepository,
    L: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        id: Uuid,
        hard: bool,
    ) -> Result<(), AdminError> {
        let actor = authorize(&self.admins, identity, Permission::ManageUsers).await?;
        let account = load_account(&self.accounts, id).await?;
        if hard {
            self.accounts.hard_delete(id).await?;
        } else {
            self.accounts.set_active(id, false).await?;
        }
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::DeleteAccount,
                EntityKind::Account,
                Some(id),
                json!({
                    "role": account.role,
                    "phone": account.phone,
                    "hard": hard,
                }),
            ),
        )
        .await?;
        tracing::info!(admin_id = %actor.id, account_id = %id, hard, "account deleted");
        Ok(())
    }
}
