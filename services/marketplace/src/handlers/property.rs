use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::OwnerIdentity;
use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::{ListingState, ListingType, MAX_PRICE_DIGITS, is_valid_price};
use roofline_domain::verification::PropertyVerificationStatus;
use roofline_storage::{ImageUrls, UploadUrl};

use crate::domain::types::{ListingTerms, Property, PropertyUpdate};
use crate::error::MarketplaceError;
use crate::handlers::ensure_active;
use crate::state::AppState;
use crate::usecase::property::{
    CreatePropertyUseCase, DeletePropertyUseCase, GetOwnPropertyUseCase,
    ListMyPropertiesUseCase, NewProperty, PropertyView, PublishPropertyUseCase,
    ToggleAvailabilityUseCase, UpdateImagesUseCase, UpdatePropertyUseCase,
};

// ── Response shaping ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: String,
    pub owner_id: String,
    pub listing_type: ListingType,
    pub property_type: String,
    pub title: String,
    pub description: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub city: String,
    pub locality: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: String,
    pub rent: Option<String>,
    pub security_deposit: Option<String>,
    pub maintenance: Option<String>,
    pub sale_price: Option<String>,
    pub is_draft: bool,
    pub is_available: bool,
    pub state: ListingState,
    pub is_verified: bool,
    pub verification_status: PropertyVerificationStatus,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms_opt")]
    pub verification_expiry: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ImageUrls>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PropertyResponse {
    pub fn new(p: Property, images: Option<ImageUrls>) -> Self {
        let state = p.state();
        let listing_type = p.terms.listing_type();
        let (rent, security_deposit, maintenance, sale_price) = match p.terms {
            ListingTerms::Rent {
                rent,
                security_deposit,
                maintenance,
            } => (Some(rent), Some(security_deposit), maintenance, None),
            ListingTerms::Sale { sale_price } => (None, None, None, Some(sale_price)),
        };
        Self {
            id: p.id.to_string(),
            owner_id: p.owner_id.to_string(),
            listing_type,
            property_type: p.property_type,
            title: p.title,
            description: p.description,
            bhk: p.bhk,
            furnishing: p.furnishing,
            city: p.city,
            locality: p.locality,
            address: p.address,
            latitude: p.location.map(|l| l.lat),
            longitude: p.location.map(|l| l.lon),
            contact_number: p.contact_number,
            rent,
            security_deposit,
            maintenance,
            sale_price,
            is_draft: p.is_draft,
            is_available: p.is_available,
            state,
            is_verified: p.is_verified,
            verification_status: p.verification_status,
            verification_expiry: p.verification_expiry,
            images,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<PropertyView> for PropertyResponse {
    fn from(view: PropertyView) -> Self {
        Self::new(view.property, Some(view.images))
    }
}

// ── Request parsing ──────────────────────────────────────────────────────────

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, MarketplaceError> {
    body.map(|Json(v)| v)
        .map_err(|e| MarketplaceError::Validation(e.body_text()))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn checked_price(value: String, name: &'static str) -> Result<String, MarketplaceError> {
    if !is_valid_price(&value) {
        return Err(MarketplaceError::Validation(format!(
            "{name}: must be digits with optional separators, at most {MAX_PRICE_DIGITS} digits"
        )));
    }
    Ok(value)
}

/// Build the price terms for `listing_type`, recording missing field names.
///
/// Price fields belonging to the other listing type are rejected, not dropped.
fn listing_terms(
    listing_type: ListingType,
    rent: Option<String>,
    security_deposit: Option<String>,
    maintenance: Option<String>,
    sale_price: Option<String>,
    missing: &mut Vec<&'static str>,
) -> Result<Option<ListingTerms>, MarketplaceError> {
    let foreign: Vec<&str> = match listing_type {
        ListingType::Rent => [("salePrice", &sale_price)]
            .into_iter()
            .filter(|(_, v)| v.is_some())
            .map(|(name, _)| name)
            .collect(),
        ListingType::Sale => [
            ("rent", &rent),
            ("securityDeposit", &security_deposit),
            ("maintenance", &maintenance),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_some())
        .map(|(name, _)| name)
        .collect(),
    };
    if !foreign.is_empty() {
        return Err(MarketplaceError::Validation(format!(
            "{}: not allowed for {} listings",
            foreign.join(", "),
            listing_type.as_str()
        )));
    }

    match listing_type {
        ListingType::Rent => {
            let rent = present(rent);
            let security_deposit = present(security_deposit);
            if rent.is_none() {
                missing.push("rent");
            }
            if security_deposit.is_none() {
                missing.push("securityDeposit");
            }
            let (Some(rent), Some(security_deposit)) = (rent, security_deposit) else {
                return Ok(None);
            };
            Ok(Some(ListingTerms::Rent {
                rent: checked_price(rent, "rent")?,
                security_deposit: checked_price(security_deposit, "securityDeposit")?,
                maintenance: present(maintenance)
                    .map(|m| checked_price(m, "maintenance"))
                    .transpose()?,
            }))
        }
        ListingType::Sale => match present(sale_price) {
            Some(sale_price) => Ok(Some(ListingTerms::Sale {
                sale_price: checked_price(sale_price, "salePrice")?,
            })),
            None => {
                missing.push("salePrice");
                Ok(None)
            }
        },
    }
}

fn location(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<GeoPoint>, MarketplaceError> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            let point = GeoPoint::new(lat, lon);
            if !point.is_valid() {
                return Err(MarketplaceError::Validation(
                    "latitude/longitude: out of range".to_owned(),
                ));
            }
            Ok(Some(point))
        }
        _ => Err(MarketplaceError::Validation(
            "latitude/longitude: both are required together".to_owned(),
        )),
    }
}

// ── POST /owner/property/create ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePropertyRequest {
    pub listing_type: Option<ListingType>,
    pub property_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub rent: Option<String>,
    pub security_deposit: Option<String>,
    pub maintenance: Option<String>,
    pub sale_price: Option<String>,
    pub is_draft: Option<bool>,
    pub with_images: Option<bool>,
}

impl CreatePropertyRequest {
    fn into_new_property(self) -> Result<NewProperty, MarketplaceError> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| {
            let value = present(value);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };
        let title = require(self.title, "title");
        let property_type = require(self.property_type, "propertyType");
        let city = require(self.city, "city");
        let locality = require(self.locality, "locality");
        let address = require(self.address, "address");
        let contact_number = require(self.contact_number, "contactNumber");

        let terms = match self.listing_type {
            Some(listing_type) => listing_terms(
                listing_type,
                self.rent,
                self.security_deposit,
                self.maintenance,
                self.sale_price,
                &mut missing,
            )?,
            None => {
                missing.push("listingType");
                None
            }
        };
        let terms = match terms {
            Some(terms) if missing.is_empty() => terms,
            _ => return Err(MarketplaceError::MissingFields(missing)),
        };

        Ok(NewProperty {
            property_type,
            title,
            description: present(self.description),
            bhk: present(self.bhk),
            furnishing: present(self.furnishing),
            city,
            locality,
            address,
            location: location(self.latitude, self.longitude)?,
            contact_number,
            terms,
            publish: self.is_draft == Some(false),
            with_images: self.with_images.unwrap_or(false),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyResponse {
    pub property: PropertyResponse,
    pub upload_urls: Vec<UploadUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

pub async fn create_property(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    body: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePropertyResponse>), MarketplaceError> {
    let input = json_body(body)?.into_new_property()?;
    ensure_active(&state, &identity).await?;
    let usecase = CreatePropertyUseCase {
        properties: state.property_repo(),
        mobiles: state.mobile_repo(),
        storage: state.storage.clone(),
    };
    let created = usecase.execute(identity.account_id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePropertyResponse {
            property: PropertyResponse::new(created.property, None),
            upload_urls: created.upload_urls,
            warning: created.warning,
        }),
    ))
}

// ── GET /owner/property/my-properties ────────────────────────────────────────

pub async fn my_properties(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyResponse>>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ListMyPropertiesUseCase {
        properties: state.property_repo(),
        storage: state.storage.clone(),
    };
    let views = usecase.execute(identity.account_id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

// ── GET /owner/property/{id} ─────────────────────────────────────────────────

pub async fn get_property(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = GetOwnPropertyUseCase {
        properties: state.property_repo(),
        storage: state.storage.clone(),
    };
    let view = usecase.execute(identity.account_id, id).await?;
    Ok(Json(view.into()))
}

// ── PATCH /owner/property/toggle-availability/{id} ───────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub id: String,
    pub is_available: bool,
}

pub async fn toggle_availability(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ToggleAvailabilityUseCase {
        properties: state.property_repo(),
    };
    let is_available = usecase.execute(identity.account_id, id).await?;
    Ok(Json(AvailabilityResponse {
        id: id.to_string(),
        is_available,
    }))
}

// ── PUT /owner/property/update-property/{id} ─────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePropertyRequest {
    pub listing_type: Option<ListingType>,
    pub property_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: Option<String>,
    pub rent: Option<String>,
    pub security_deposit: Option<String>,
    pub maintenance: Option<String>,
    pub sale_price: Option<String>,
}

impl UpdatePropertyRequest {
    fn into_update(self) -> Result<PropertyUpdate, MarketplaceError> {
        let touches_price = [&self.rent, &self.security_deposit, &self.maintenance, &self.sale_price]
            .iter()
            .any(|v| v.is_some());
        let terms = match self.listing_type {
            Some(listing_type) => {
                let mut missing = Vec::new();
                let terms = listing_terms(
                    listing_type,
                    self.rent,
                    self.security_deposit,
                    self.maintenance,
                    self.sale_price,
                    &mut missing,
                )?;
                if !missing.is_empty() {
                    return Err(MarketplaceError::MissingFields(missing));
                }
                terms
            }
            None if touches_price => {
                return Err(MarketplaceError::MissingFields(vec!["listingType"]));
            }
            None => None,
        };
        let update = PropertyUpdate {
            property_type: present(self.property_type),
            title: present(self.title),
            description: self.description,
            bhk: self.bhk,
            furnishing: self.furnishing,
            city: present(self.city),
            locality: present(self.locality),
            address: present(self.address),
            location: location(self.latitude, self.longitude)?,
            contact_number: present(self.contact_number),
            terms,
        };
        if update.is_empty() {
            return Err(MarketplaceError::Validation(
                "at least one property field is required".to_owned(),
            ));
        }
        Ok(update)
    }
}

pub async fn update_property(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdatePropertyRequest>, JsonRejection>,
) -> Result<Json<PropertyResponse>, MarketplaceError> {
    let update = json_body(body)?.into_update()?;
    ensure_active(&state, &identity).await?;
    let usecase = UpdatePropertyUseCase {
        properties: state.property_repo(),
        mobiles: state.mobile_repo(),
        cooldown_days: state.settings.edit_cooldown_days,
    };
    let property = usecase.execute(identity.account_id, id, update).await?;
    Ok(Json(PropertyResponse::new(property, None)))
}

// ── PUT /owner/property/update-images/{id} ───────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImagesResponse {
    pub property: PropertyResponse,
    pub upload_urls: Vec<UploadUrl>,
}

pub async fn update_images(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UpdateImagesResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = UpdateImagesUseCase {
        properties: state.property_repo(),
        mobiles: state.mobile_repo(),
        storage: state.storage.clone(),
        cooldown_days: state.settings.edit_cooldown_days,
    };
    let (property, upload_urls) = usecase.execute(identity.account_id, id).await?;
    Ok(Json(UpdateImagesResponse {
        property: PropertyResponse::new(property, None),
        upload_urls,
    }))
}

// ── PATCH /owner/property/publish/{id} ───────────────────────────────────────

pub async fn publish_property(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = PublishPropertyUseCase {
        properties: state.property_repo(),
        mobiles: state.mobile_repo(),
    };
    usecase.execute(identity.account_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /owner/property/{id} ──────────────────────────────────────────────

pub async fn delete_property(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = DeletePropertyUseCase {
        properties: state.property_repo(),
    };
    usecase.execute(identity.account_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
