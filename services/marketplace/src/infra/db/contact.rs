use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};
use uuid::Uuid;

use roofline_schema::{contacts, properties};

use super::property::property_from_model;
use crate::domain::repository::ContactRepository;
use crate::domain::types::{Contact, PropertySummary};
use crate::error::MarketplaceError;

#[derive(Clone)]
pub struct DbContactRepository {
    pub db: DatabaseConnection,
}

impl ContactRepository for DbContactRepository {
    async fn find_for_user(
        &self,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<Option<Contact>, MarketplaceError> {
        let model = contacts::Entity::find()
            .filter(contacts::Column::UserId.eq(user_id))
            .filter(contacts::Column::PropertyId.eq(property_id))
            .order_by_asc(contacts::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find contact for user")?;
        Ok(model.map(contact_from_model))
    }

    async fn create(&self, contact: &Contact) -> Result<(), MarketplaceError> {
        contacts::ActiveModel {
            id: Set(contact.id),
            property_id: Set(contact.property_id),
            user_id: Set(contact.user_id),
            user_name: Set(contact.user_name.clone()),
            user_phone: Set(contact.user_phone.clone()),
            message: Set(contact.message.clone()),
            user_deleted: Set(contact.user_deleted),
            owner_deleted: Set(contact.owner_deleted),
            created_at: Set(contact.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert contact")?;
        Ok(())
    }

    async fn restore_for_user(&self, id: Uuid) -> Result<(), MarketplaceError> {
        contacts::Entity::update_many()
            .filter(contacts::Column::Id.eq(id))
            .col_expr(contacts::Column::UserDeleted, Expr::value(false))
            .exec(&self.db)
            .await
            .context("restore contact for user")?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError> {
        let rows = contacts::Entity::find()
            .find_also_related(properties::Entity)
            .filter(contacts::Column::UserId.eq(user_id))
            .filter(contacts::Column::UserDeleted.eq(false))
            .order_by_desc(contacts::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list contacts for user")?;
        Ok(with_summaries(rows)?)
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError> {
        let rows = contacts::Entity::find()
            .find_also_related(properties::Entity)
            .filter(properties::Column::OwnerId.eq(owner_id))
            .filter(contacts::Column::OwnerDeleted.eq(false))
            .order_by_desc(contacts::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list leads for owner")?;
        Ok(with_summaries(rows)?)
    }

    async fn hide_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, MarketplaceError> {
        let result = contacts::Entity::update_many()
            .filter(contacts::Column::Id.eq(id))
            .filter(contacts::Column::UserId.eq(user_id))
            .filter(contacts::Column::UserDeleted.eq(false))
            .col_expr(contacts::Column::UserDeleted, Expr::value(true))
            .exec(&self.db)
            .await
            .context("hide contact for user")?;
        Ok(result.rows_affected > 0)
    }

    async fn hide_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<bool, MarketplaceError> {
        let result = contacts::Entity::update_many()
            .filter(contacts::Column::Id.eq(id))
            .filter(contacts::Column::OwnerDeleted.eq(false))
            .filter(
                contacts::Column::PropertyId.in_subquery(
                    sea_orm::sea_query::Query::select()
                        .column(properties::Column::Id)
                        .from(properties::Entity)
                        .and_where(Expr::col(properties::Column::OwnerId).eq(owner_id))
                        .to_owned(),
                ),
            )
            .col_expr(contacts::Column::OwnerDeleted, Expr::value(true))
            .exec(&self.db)
            .await
            .context("hide lead for owner")?;
        Ok(result.rows_affected > 0)
    }
}

fn with_summaries(
    rows: Vec<(contacts::Model, Option<properties::Model>)>,
) -> anyhow::Result<Vec<(Contact, PropertySummary)>> {
    rows.into_iter()
        .filter_map(|(contact, property)| property.map(|p| (contact, p)))
        .map(|(contact, property)| {
            let summary = property_from_model(property)?.summary();
            Ok((contact_from_model(contact), summary))
        })
        .collect()
}

fn contact_from_model(model: contacts::Model) -> Contact {
    Contact {
        id: model.id,
        property_id: model.property_id,
        user_id: model.user_id,
        user_name: model.user_name,
        user_phone: model.user_phone,
        message: model.message,
        user_deleted: model.user_deleted,
        owner_deleted: model.owner_deleted,
        created_at: model.created_at,
    }
}
