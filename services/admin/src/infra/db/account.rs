use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use roofline_domain::account::AccountRole;
use roofline_domain::pagination::PageRequest;
use roofline_schema::{accounts, contacts, wishlists};

use crate::domain::repository::AccountAdminRepository;
use crate::domain::types::{AccountFilter, AccountRecord};
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbAccountAdminRepository {
    pub db: DatabaseConnection,
}

fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", term.to_lowercase());
    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col(accounts::Column::Name))).like(pattern.clone()))
        .add(Expr::expr(Func::lower(Expr::col(accounts::Column::Email))).like(pattern))
        .add(accounts::Column::Phone.contains(term))
}

impl AccountAdminRepository for DbAccountAdminRepository {
    async fn list(
        &self,
        filter: &AccountFilter,
        page: PageRequest,
    ) -> Result<Vec<AccountRecord>, AdminError> {
        let mut query = accounts::Entity::find();
        if let Some(role) = filter.role {
            query = query.filter(accounts::Column::Role.eq(role.as_str()));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(active));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(search_condition(term));
        }
        let models = query
            .order_by_desc(accounts::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list accounts")?;
        Ok(models
            .into_iter()
            .map(record_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AdminError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find account")?;
        Ok(model.map(record_from_model).transpose()?)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), AdminError> {
        accounts::Entity::update_many()
            .filter(accounts::Column::Id.eq(id))
            .col_expr(accounts::Column::IsActive, Expr::value(active))
            .col_expr(accounts::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("set account active flag")?;
        Ok(())
    }

    async fn hard_delete(&self, id: Uuid) -> Result<(), AdminError> {
        // Contacts and wishlists reference the seeker without a foreign key; the
        // owner's listings and everything under them go by cascade.
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    wishlists::Entity::delete_many()
                        .filter(wishlists::Column::UserId.eq(id))
                        .exec(txn)
                        .await?;
                    contacts::Entity::delete_many()
                        .filter(contacts::Column::UserId.eq(id))
                        .exec(txn)
                        .await?;
                    accounts::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("hard delete account")?;
        Ok(())
    }
}

fn record_from_model(model: accounts::Model) -> anyhow::Result<AccountRecord> {
    let role = AccountRole::parse(&model.role)
        .with_context(|| format!("unknown account role {:?}", model.role))?;
    Ok(AccountRecord {
        id: model.id,
        role,
        name: model.name,
        email: model.email,
        phone: model.phone,
        is_verified: model.is_verified,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
