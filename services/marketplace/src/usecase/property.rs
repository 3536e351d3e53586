use chrono::Utc;
use futures::future::join_all;
use uuid::Uuid;

use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::ListingState;
use roofline_domain::verification::PropertyVerificationStatus;
use roofline_storage::{ImageUrls, ObjectStorage, UploadUrl, issue_image_upload_urls, resolve_image_urls};

use crate::domain::repository::{MobileVerificationRepository, PropertyRepository};
use crate::domain::types::{CooldownOutcome, ListingTerms, Property, PropertyChange, PropertyUpdate};
use crate::error::MarketplaceError;
use crate::usecase::expiry::{refresh_expiry, refresh_expiry_all};
use crate::usecase::mobile_otp::is_mobile_verified;

/// Warning returned when a property was saved but its upload URLs could not be issued.
pub const IMAGE_URLS_WARNING: &str =
    "property saved; image upload URLs could not be issued, retry from update-images";

/// A property together with presigned GET URLs for its image slots.
#[derive(Debug, Clone)]
pub struct PropertyView {
    pub property: Property,
    pub images: ImageUrls,
}

pub async fn with_images<S: ObjectStorage>(storage: &S, property: Property) -> PropertyView {
    let images = resolve_image_urls(storage, property.id).await;
    PropertyView { property, images }
}

pub async fn with_images_all<S: ObjectStorage>(
    storage: &S,
    properties: Vec<Property>,
) -> Vec<PropertyView> {
    join_all(properties.into_iter().map(|p| with_images(storage, p))).await
}

/// Load a non-deleted property owned by `owner_id`.
pub async fn load_owned<P: PropertyRepository>(
    repo: &P,
    property_id: Uuid,
    owner_id: Uuid,
) -> Result<Property, MarketplaceError> {
    let property = repo
        .find_by_id(property_id)
        .await?
        .filter(|p| !p.state().is_deleted())
        .ok_or(MarketplaceError::PropertyNotFound)?;
    if property.owner_id != owner_id {
        return Err(MarketplaceError::Forbidden);
    }
    Ok(property)
}

async fn require_verified_contact<M: MobileVerificationRepository>(
    mobiles: &M,
    contact_number: &str,
) -> Result<(), MarketplaceError> {
    if !is_mobile_verified(mobiles, contact_number).await? {
        return Err(MarketplaceError::ContactNotVerified);
    }
    Ok(())
}

// ── CreateProperty ───────────────────────────────────────────────────────────

pub struct NewProperty {
    pub property_type: String,
    pub title: String,
    pub description: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub city: String,
    pub locality: String,
    pub address: String,
    pub location: Option<GeoPoint>,
    pub contact_number: String,
    pub terms: ListingTerms,
    pub publish: bool,
    pub with_images: bool,
}

#[derive(Debug)]
pub struct CreatedProperty {
    pub property: Property,
    pub upload_urls: Vec<UploadUrl>,
    pub warning: Option<&'static str>,
}

pub struct CreatePropertyUseCase<P, M, S>
where
    P: PropertyRepository,
    M: MobileVerificationRepository,
    S: ObjectStorage,
{
    pub properties: P,
    pub mobiles: M,
    pub storage: S,
}

impl<P, M, S> CreatePropertyUseCase<P, M, S>
where
    P: PropertyRepository,
    M: MobileVerificationRepository,
    S: ObjectStorage,
{
    pub async fn execute(
        &self,
        owner_id: Uuid,
        input: NewProperty,
    ) -> Result<CreatedProperty, MarketplaceError> {
        if input.publish {
            require_verified_contact(&self.mobiles, &input.contact_number).await?;
        }
        let now = Utc::now();
        let property = Property {
            id: Uuid::now_v7(),
            owner_id,
            property_type: input.property_type,
            title: input.title,
            description: input.description,
            bhk: input.bhk,
            furnishing: input.furnishing,
            city: input.city,
            locality: input.locality,
            address: input.address,
            location: input.location,
            contact_number: input.contact_number,
            terms: input.terms,
            is_draft: !input.publish,
            is_available: true,
            is_verified: false,
            verification_status: PropertyVerificationStatus::NotVerified,
            verification_expiry: None,
            created_at: now,
            updated_at: now,
        };
        self.properties.create(&property).await?;
        tracing::info!(property_id = %property.id, %owner_id, "property created");

        let mut created = CreatedProperty {
            property,
            upload_urls: Vec::new(),
            warning: None,
        };
        if input.with_images {
            match issue_image_upload_urls(&self.storage, created.property.id).await {
                Ok(urls) => created.upload_urls = urls,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        property_id = %created.property.id,
                        "image upload URLs not issued after create"
                    );
                    created.warning = Some(IMAGE_URLS_WARNING);
                }
            }
        }
        Ok(created)
    }
}

// ── MyProperties / GetProperty ───────────────────────────────────────────────

pub struct ListMyPropertiesUseCase<P: PropertyRepository, S: ObjectStorage> {
    pub properties: P,
    pub storage: S,
}

impl<P: PropertyRepository, S: ObjectStorage> ListMyPropertiesUseCase<P, S> {
    pub async fn execute(&self, owner_id: Uuid) -> Result<Vec<PropertyView>, MarketplaceError> {
        let properties = self.properties.list_by_owner(owner_id).await?;
        let properties = refresh_expiry_all(&self.properties, properties, Utc::now()).await?;
        Ok(with_images_all(&self.storage, properties).await)
    }
}

pub struct GetOwnPropertyUseCase<P: PropertyRepository, S: ObjectStorage> {
    pub properties: P,
    pub storage: S,
}

impl<P: PropertyRepository, S: ObjectStorage> GetOwnPropertyUseCase<P, S> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        property_id: Uuid,
    ) -> Result<PropertyView, MarketplaceError> {
        let property = load_owned(&self.properties, property_id, owner_id).await?;
        let property = refresh_expiry(&self.properties, property, Utc::now()).await?;
        Ok(with_images(&self.storage, property).await)
    }
}

// ── ToggleAvailability ───────────────────────────────────────────────────────

pub struct ToggleAvailabilityUseCase<P: PropertyRepository> {
    pub properties: P,
}

impl<P: PropertyRepository> ToggleAvailabilityUseCase<P> {
    /// Returns the new `is_available` value.
    pub async fn execute(&self, owner_id: Uuid, property_id: Uuid) -> Result<bool, MarketplaceError> {
        let property = load_owned(&self.properties, property_id, owner_id).await?;
        if property.state() == ListingState::Draft {
            return Err(MarketplaceError::InvalidState(
                "publish the property before toggling availability",
            ));
        }
        let available = !property.is_available;
        self.properties.set_available(property_id, available).await?;
        Ok(available)
    }
}

// ── UpdateProperty ───────────────────────────────────────────────────────────

async fn apply_with_cooldown<P: PropertyRepository>(
    repo: &P,
    property_id: Uuid,
    change: PropertyChange,
    cooldown_days: i64,
) -> Result<Property, MarketplaceError> {
    match repo
        .update_with_cooldown(property_id, change, cooldown_days, Utc::now())
        .await?
    {
        Some(CooldownOutcome::Updated(property)) => Ok(property),
        Some(CooldownOutcome::TooSoon { days_left }) => {
            Err(MarketplaceError::EditCooldown { days_left })
        }
        None => Err(MarketplaceError::PropertyNotFound),
    }
}

pub struct UpdatePropertyUseCase<P: PropertyRepository, M: MobileVerificationRepository> {
    pub properties: P,
    pub mobiles: M,
    pub cooldown_days: i64,
}

impl<P: PropertyRepository, M: MobileVerificationRepository> UpdatePropertyUseCase<P, M> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        property_id: Uuid,
        update: PropertyUpdate,
    ) -> Result<Property, MarketplaceError> {
        let property = load_owned(&self.properties, property_id, owner_id).await?;
        if let Some(ref number) = update.contact_number {
            if *number != property.contact_number && !property.is_draft {
                require_verified_contact(&self.mobiles, number).await?;
            }
        }
        apply_with_cooldown(
            &self.properties,
            property_id,
            PropertyChange::Fields(update),
            self.cooldown_days,
        )
        .await
    }
}

// ── UpdateImages ─────────────────────────────────────────────────────────────

pub struct UpdateImagesUseCase<P, M, S>
where
    P: PropertyRepository,
    M: MobileVerificationRepository,
    S: ObjectStorage,
{
    pub properties: P,
    pub mobiles: M,
    pub storage: S,
    pub cooldown_days: i64,
}

impl<P, M, S> UpdateImagesUseCase<P, M, S>
where
    P: PropertyRepository,
    M: MobileVerificationRepository,
    S: ObjectStorage,
{
    pub async fn execute(
        &self,
        owner_id: Uuid,
        property_id: Uuid,
    ) -> Result<(Property, Vec<UploadUrl>), MarketplaceError> {
        let property = load_owned(&self.properties, property_id, owner_id).await?;
        // Uploading takes a draft live, so it needs the same contact check as publish.
        if property.is_draft {
            require_verified_contact(&self.mobiles, &property.contact_number).await?;
        }
        // Issue URLs before leaving draft so a signing failure changes nothing.
        let urls = issue_image_upload_urls(&self.storage, property_id).await?;
        let property = apply_with_cooldown(
            &self.properties,
            property_id,
            PropertyChange::ImagesUploaded,
            self.cooldown_days,
        )
        .await?;
        Ok((property, urls))
    }
}

// ── Publish ──────────────────────────────────────────────────────────────────

pub struct PublishPropertyUseCase<P: PropertyRepository, M: MobileVerificationRepository> {
    pub properties: P,
    pub mobiles: M,
}

impl<P: PropertyRepository, M: MobileVerificationRepository> PublishPropertyUseCase<P, M> {
    pub async fn execute(&self, owner_id: Uuid, property_id: Uuid) -> Result<(), MarketplaceError> {
        let property = load_owned(&self.properties, property_id, owner_id).await?;
        if property.state().is_live() {
            return Ok(());
        }
        require_verified_contact(&self.mobiles, &property.contact_number).await?;
        self.properties.publish(property_id).await
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeletePropertyUseCase<P: PropertyRepository> {
    pub properties: P,
}

impl<P: PropertyRepository> DeletePropertyUseCase<P> {
    pub async fn execute(&self, owner_id: Uuid, property_id: Uuid) -> Result<(), MarketplaceError> {
        load_owned(&self.properties, property_id, owner_id).await?;
        self.properties.soft_delete(property_id).await?;
        tracing::info!(%property_id, %owner_id, "property deleted");
        Ok(())
    }
}
