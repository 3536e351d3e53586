use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use uuid::Uuid;

use roofline_schema::{properties, wishlists};

use super::property::property_from_model;
use crate::domain::repository::WishlistRepository;
use crate::domain::types::WishlistItem;
use crate::error::MarketplaceError;

#[derive(Clone)]
pub struct DbWishlistRepository {
    pub db: DatabaseConnection,
}

impl WishlistRepository for DbWishlistRepository {
    async fn add(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, MarketplaceError> {
        let am = wishlists::ActiveModel {
            user_id: Set(user_id),
            property_id: Set(property_id),
            created_at: Set(now),
        };
        let inserted = wishlists::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([wishlists::Column::UserId, wishlists::Column::PropertyId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("add wishlist entry")?;
        Ok(inserted > 0)
    }

    async fn remove(&self, user_id: Uuid, property_id: Uuid) -> Result<bool, MarketplaceError> {
        let result = wishlists::Entity::delete_many()
            .filter(wishlists::Column::UserId.eq(user_id))
            .filter(wishlists::Column::PropertyId.eq(property_id))
            .exec(&self.db)
            .await
            .context("remove wishlist entry")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, MarketplaceError> {
        let entries = wishlists::Entity::find()
            .filter(wishlists::Column::UserId.eq(user_id))
            .order_by_desc(wishlists::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list wishlist entries")?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = entries.iter().map(|e| e.property_id).collect();
        let models = properties::Entity::find()
            .filter(properties::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .context("load wishlisted properties")?;
        let mut by_id = std::collections::HashMap::with_capacity(models.len());
        for model in models {
            let property = property_from_model(model)?;
            by_id.insert(property.id, property);
        }

        // Soft-deleted listings drop out of the wishlist view.
        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let property = by_id.get(&entry.property_id)?;
                if property.state().is_deleted() {
                    return None;
                }
                Some(WishlistItem {
                    property: property.summary(),
                    added_at: entry.created_at,
                })
            })
            .collect())
    }
}
