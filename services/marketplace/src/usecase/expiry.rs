use chrono::{DateTime, Utc};

use roofline_domain::verification::{PropertyVerificationStatus, is_verification_expired};

use crate::domain::repository::PropertyRepository;
use crate::domain::types::Property;
use crate::error::MarketplaceError;

/// Flip a verified property whose window has passed to `EXPIRED` before it is returned.
pub async fn refresh_expiry<R: PropertyRepository>(
    repo: &R,
    mut property: Property,
    now: DateTime<Utc>,
) -> Result<Property, MarketplaceError> {
    if is_verification_expired(property.is_verified, property.verification_expiry, now) {
        repo.expire_verification(property.id).await?;
        tracing::info!(property_id = %property.id, "property verification expired");
        property.is_verified = false;
        property.verification_status = PropertyVerificationStatus::Expired;
    }
    Ok(property)
}

pub async fn refresh_expiry_all<R: PropertyRepository>(
    repo: &R,
    properties: Vec<Property>,
    now: DateTime<Utc>,
) -> Result<Vec<Property>, MarketplaceError> {
    let mut refreshed = Vec::with_capacity(properties.len());
    for property in properties {
        refreshed.push(refresh_expiry(repo, property, now).await?);
    }
    Ok(refreshed)
}
