use chrono::Utc;
use uuid::Uuid;

use roofline_domain::geo::{GeoPoint, within_radius};
use roofline_domain::listing::ListingType;
use roofline_domain::pagination::PageRequest;
use roofline_storage::ObjectStorage;

use crate::domain::repository::PropertyRepository;
use crate::domain::types::{AreaCount, FilterOptions, SearchFilter};
use crate::error::MarketplaceError;
use crate::usecase::expiry::{refresh_expiry, refresh_expiry_all};
use crate::usecase::property::{PropertyView, with_images, with_images_all};

// ── SearchProperties ─────────────────────────────────────────────────────────

pub struct SearchPropertiesUseCase<P: PropertyRepository, S: ObjectStorage> {
    pub properties: P,
    pub storage: S,
}

impl<P: PropertyRepository, S: ObjectStorage> SearchPropertiesUseCase<P, S> {
    pub async fn execute(
        &self,
        filter: SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<PropertyView>, MarketplaceError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(MarketplaceError::Validation(
                    "minPrice: must not exceed maxPrice".to_owned(),
                ));
            }
        }
        let found = self.properties.search(&filter, page.clamped()).await?;
        let mut found = refresh_expiry_all(&self.properties, found, Utc::now()).await?;
        if filter.verified_only {
            found.retain(|p| p.is_verified);
        }
        Ok(with_images_all(&self.storage, found).await)
    }
}

// ── NearMe ───────────────────────────────────────────────────────────────────

pub struct NearMeQuery {
    pub origin: GeoPoint,
    pub radius_km: Option<f64>,
    pub listing_type: Option<ListingType>,
}

pub struct NearMeUseCase<P: PropertyRepository, S: ObjectStorage> {
    pub properties: P,
    pub storage: S,
    pub default_radius_km: f64,
}

impl<P: PropertyRepository, S: ObjectStorage> NearMeUseCase<P, S> {
    /// Live listings within the radius, nearest first, with their distance in km.
    pub async fn execute(
        &self,
        query: NearMeQuery,
    ) -> Result<Vec<(PropertyView, f64)>, MarketplaceError> {
        if !query.origin.is_valid() {
            return Err(MarketplaceError::Validation(
                "lat/lon: out of range".to_owned(),
            ));
        }
        let radius_km = query.radius_km.unwrap_or(self.default_radius_km);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(MarketplaceError::Validation(
                "radiusKm: must be a positive number".to_owned(),
            ));
        }

        let candidates = self.properties.list_live_located(query.listing_type).await?;
        let hits = within_radius(candidates, query.origin, radius_km, |p| p.location);

        let mut results = Vec::with_capacity(hits.len());
        let now = Utc::now();
        for (property, distance) in hits {
            let property = refresh_expiry(&self.properties, property, now).await?;
            results.push((with_images(&self.storage, property).await, distance));
        }
        Ok(results)
    }
}

// ── Filters / AvailableAreas ─────────────────────────────────────────────────

pub struct FilterOptionsUseCase<P: PropertyRepository> {
    pub properties: P,
}

impl<P: PropertyRepository> FilterOptionsUseCase<P> {
    pub async fn execute(&self) -> Result<FilterOptions, MarketplaceError> {
        self.properties.filter_options().await
    }
}

pub struct AvailableAreasUseCase<P: PropertyRepository> {
    pub properties: P,
}

impl<P: PropertyRepository> AvailableAreasUseCase<P> {
    pub async fn execute(&self) -> Result<Vec<AreaCount>, MarketplaceError> {
        self.properties.available_areas().await
    }
}

// ── PublicProperty ───────────────────────────────────────────────────────────

pub struct GetPublicPropertyUseCase<P: PropertyRepository, S: ObjectStorage> {
    pub properties: P,
    pub storage: S,
}

impl<P: PropertyRepository, S: ObjectStorage> GetPublicPropertyUseCase<P, S> {
    pub async fn execute(&self, property_id: Uuid) -> Result<PropertyView, MarketplaceError> {
        let property = self
            .properties
            .find_by_id(property_id)
            .await?
            .filter(|p| p.state().is_live())
            .ok_or(MarketplaceError::PropertyNotFound)?;
        let property = refresh_expiry(&self.properties, property, Utc::now()).await?;
        Ok(with_images(&self.storage, property).await)
    }
}
