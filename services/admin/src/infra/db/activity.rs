use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use roofline_domain::pagination::PageRequest;
use roofline_schema::admin_activity_logs;

use crate::domain::repository::ActivityLogRepository;
use crate::domain::types::ActivityEntry;
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbActivityLogRepository {
    pub db: DatabaseConnection,
}

impl ActivityLogRepository for DbActivityLogRepository {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), AdminError> {
        admin_activity_logs::ActiveModel {
            id: Set(entry.id),
            admin_id: Set(entry.admin_id),
            action: Set(entry.action.clone()),
            entity_type: Set(entry.entity_type.clone()),
            entity_id: Set(entry.entity_id),
            details: Set(entry.details.clone()),
            created_at: Set(entry.created_at),
        }
        .insert(&self.db)
        .await
        .context("append activity log")?;
        Ok(())
    }

    async fn list(
        &self,
        admin_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<ActivityEntry>, AdminError> {
        let mut query = admin_activity_logs::Entity::find();
        if let Some(admin_id) = admin_id {
            query = query.filter(admin_activity_logs::Column::AdminId.eq(admin_id));
        }
        let models = query
            .order_by_desc(admin_activity_logs::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list activity log")?;
        Ok(models
            .into_iter()
            .map(|m| ActivityEntry {
                id: m.id,
                admin_id: m.admin_id,
                action: m.action,
                entity_type: m.entity_type,
                entity_id: m.entity_id,
                details: m.details,
                created_at: m.created_at,
            })
            .collect())
    }
}
