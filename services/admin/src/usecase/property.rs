use serde_json::json;
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::Permission;
use roofline_domain::listing::ListingState;
use roofline_domain::pagination::PageRequest;
use roofline_storage::{ImageUrls, ObjectStorage, resolve_image_urls};

use crate::domain::repository::{
    ActivityLogRepository, AdminRepository, PropertyAdminRepository,
};
use crate::domain::types::{Action, ActivityEntry, EntityKind, PropertyFilter, PropertyRecord};
use crate::error::AdminError;
use crate::usecase::access::{authorize, record};

async fn load_property<R: PropertyAdminRepository>(
    properties: &R,
    id: Uuid,
) -> Result<PropertyRecord, AdminError> {
    properties
        .find_by_id(id)
        .await?
        .ok_or(AdminError::PropertyNotFound)
}

pub struct ListPropertiesUseCase<A: AdminRepository, R: PropertyAdminRepository> {
    pub admins: A,
    pub properties: R,
}

impl<A: AdminRepository, R: PropertyAdminRepository> ListPropertiesUseCase<A, R> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        filter: PropertyFilter,
        page: PageRequest,
    ) -> Result<Vec<PropertyRecord>, AdminError> {
        authorize(&self.admins, identity, Permission::ManageProperties).await?;
        self.properties.list(&filter, page).await
    }
}

pub struct GetPropertyUseCase<A, R, S>
where
    A: AdminRepository,
    R: PropertyAdminRepository,
    S: ObjectStorage,
{
    pub admins: A,
    pub properties: R,
    pub storage: S,
}

impl<A, R, S> GetPropertyUseCase<A, R, S>
where
    A: AdminRepository,
    R: PropertyAdminRepository,
    S: ObjectStorage,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        id: Uuid,
    ) -> Result<(PropertyRecord, ImageUrls), AdminError> {
        authorize(&self.admins, identity, Permission::ManageProperties).await?;
        let property = load_property(&self.properties, id).await?;
        let images = resolve_image_urls(&self.storage, property.id).await;
        Ok((property, images))
    }
}

/// Pause or resume a published listing on the owner's behalf.
pub struct SetPropertyAvailabilityUseCase<A, R, L>
where
    A: AdminRepository,
    R: PropertyAdminRepository,
    L: ActivityLogRepository,
{
    pub admins: A,
    pub properties: R,
    pub log: L,
}

impl<A, R, L> SetPropertyAvailabilityUseCase<A, R, L>
where
    A: AdminRepository,
    R: PropertyAdminRepository,
    L: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        id: Uuid,
        available: bool,
    ) -> Result<PropertyRecord, AdminError> {
        let actor = authorize(&self.admins, identity, Permission::ManageProperties).await?;
        let mut property = load_property(&self.properties, id).await?;
        match property.state() {
            ListingState::Deleted => return Err(AdminError::PropertyNotFound),
            ListingState::Draft => {
                return Err(AdminError::InvalidState(
                    "draft listings cannot change availability",
                ));
            }
            ListingState::Available | ListingState::Paused => {}
        }
        self.properties.set_available(id, available).await?;
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::UpdatePropertyAvailability,
                EntityKind::Property,
                Some(id),
                json!({ "isAvailable": available }),
            ),
        )
        .await?;
        property.is_available = available;
        Ok(property)
    }
}

pub struct DeletePropertyUseCase<A, R, L>
where
    A: AdminRepository,
    R: PropertyAdminRepository,
    L: ActivityLogRepository,
{
    pub admins: A,
    pub properties: R,
    pub log: L,
}

impl<A, R, L> DeletePropertyUseCase<A, R, L>
where
    A: AdminRepository,
    R: PropertyAdminRepository,
    L: ActivityLogRepository,
{
    pub async fn execute(&self, identity: &AdminIdentity, id: Uuid) -> Result<(), AdminError> {
        let actor = authorize(&self.admins, identity, Permission::ManageProperties).await?;
        let property = load_property(&self.properties, id).await?;
        if property.state().is_deleted() {
            return Err(AdminError::PropertyNotFound);
        }
        self.properties.soft_delete(id).await?;
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::DeleteProperty,
                EntityKind::Property,
                Some(id),
                json!({ "ownerId": property.owner_id, "title": property.title }),
            ),
        )
        .await?;
        tracing::info!(admin_id = %actor.id, property_id = %id, "property deleted by admin");
        Ok(())
    }
}
