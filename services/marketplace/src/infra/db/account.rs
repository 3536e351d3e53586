use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionError, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use roofline_core::sea_ext::is_unique_violation;
use roofline_domain::account::AccountRole;
use roofline_schema::accounts;

use super::outbox::insert_outbox_event;
use crate::domain::repository::AccountRepository;
use crate::domain::types::{Account, OutboxEvent};
use crate::error::MarketplaceError;

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_phone(
        &self,
        role: AccountRole,
        phone: &str,
    ) -> Result<Option<Account>, MarketplaceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Role.eq(role.as_str()))
            .filter(accounts::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .context("find account by phone")?;
        Ok(model.map(account_from_model).transpose()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, MarketplaceError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model).transpose()?)
    }

    async fn exists(
        &self,
        role: AccountRole,
        phone: &str,
        email: &str,
    ) -> Result<bool, MarketplaceError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Role.eq(role.as_str()))
            .filter(
                Condition::any()
                    .add(accounts::Column::Phone.eq(phone))
                    .add(accounts::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await
            .context("count accounts by phone or email")?;
        Ok(count > 0)
    }

    async fn create_with_outbox(
        &self,
        account: &Account,
        event: &OutboxEvent,
    ) -> Result<(), MarketplaceError> {
        let result = self
            .db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let account = account.clone();
                let event = event.clone();
                Box::pin(async move {
                    accounts::ActiveModel {
                        id: Set(account.id),
                        role: Set(account.role.as_str().to_owned()),
                        name: Set(account.name),
                        email: Set(account.email),
                        phone: Set(account.phone),
                        password_hash: Set(account.password_hash),
                        otp: Set(account.otp),
                        otp_expires_at: Set(account.otp_expires_at),
                        is_verified: Set(account.is_verified),
                        is_active: Set(account.is_active),
                        created_at: Set(account.created_at),
                        updated_at: Set(account.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(MarketplaceError::AccountAlreadyExists)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create account").into()),
        }
    }

    async fn store_otp_with_outbox(
        &self,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), MarketplaceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let otp = otp.to_owned();
                let event = event.clone();
                Box::pin(async move {
                    accounts::Entity::update_many()
                        .filter(accounts::Column::Id.eq(id))
                        .col_expr(accounts::Column::Otp, Expr::value(otp))
                        .col_expr(accounts::Column::OtpExpiresAt, Expr::value(expires_at))
                        .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
                        .exec(txn)
                        .await?;
                    insert_outbox_event(txn, &event).await
                })
            })
            .await
            .context("store account otp")?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), MarketplaceError> {
        accounts::Entity::update_many()
            .filter(accounts::Column::Id.eq(id))
            .col_expr(accounts::Column::IsVerified, Expr::value(true))
            .col_expr(accounts::Column::Otp, Expr::value(Option::<String>::None))
            .col_expr(
                accounts::Column::OtpExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("mark account verified")?;
        Ok(())
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), MarketplaceError> {
        accounts::Entity::update_many()
            .filter(accounts::Column::Id.eq(id))
            .col_expr(accounts::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(accounts::Column::Otp, Expr::value(Option::<String>::None))
            .col_expr(
                accounts::Column::OtpExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("reset account password")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        let mut update = accounts::Entity::update_many()
            .filter(accounts::Column::Id.eq(id))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()));
        if let Some(name) = name {
            update = update.col_expr(accounts::Column::Name, Expr::value(name));
        }
        if let Some(email) = email {
            update = update.col_expr(accounts::Column::Email, Expr::value(email));
        }
        match update.exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(MarketplaceError::AccountAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("update account profile").into()),
        }
    }
}

pub(super) fn account_from_model(model: accounts::Model) -> anyhow::Result<Account> {
    let role = AccountRole::parse(&model.role)
        .with_context(|| format!("unknown account role {:?}", model.role))?;
    Ok(Account {
        id: model.id,
        role,
        name: model.name,
        email: model.email,
        phone: model.phone,
        password_hash: model.password_hash,
        otp: model.otp,
        otp_expires_at: model.otp_expires_at,
        is_verified: model.is_verified,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
