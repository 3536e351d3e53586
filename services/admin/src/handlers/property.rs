use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::listing::{ListingState, ListingType};
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::PropertyVerificationStatus;
use roofline_storage::ImageUrls;

use crate::domain::types::{PropertyFilter, PropertyRecord};
use crate::error::AdminError;
use crate::handlers::{json_body, non_empty, parse_query};
use crate::state::AppState;
use crate::usecase::property::{
    DeletePropertyUseCase, GetPropertyUseCase, ListPropertiesUseCase,
    SetPropertyAvailabilityUseCase,
};

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
    fn new(p: PropertyRecord, images: Option<ImageUrls>) -> Self {
        let state = p.state();
        Self {
            id: p.id.to_string(),
            owner_id: p.owner_id.to_string(),
            listing_type: p.listing_type,
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
            rent: p.rent,
            security_deposit: p.security_deposit,
            maintenance: p.maintenance,
            sale_price: p.sale_price,
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

impl From<PropertyRecord> for PropertyResponse {
    fn from(p: PropertyRecord) -> Self {
        Self::new(p, None)
    }
}

// ── GET /properties ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListPropertiesQuery {
    pub listing_type: Option<ListingType>,
    pub state: Option<ListingState>,
    pub verification_status: Option<PropertyVerificationStatus>,
    pub owner_id: Option<Uuid>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_properties(
    identity: AdminIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<PropertyResponse>>, AdminError> {
    let query: ListPropertiesQuery = parse_query(raw_query)?;
    let usecase = ListPropertiesUseCase {
        admins: state.admin_repo(),
        properties: state.property_repo(),
    };
    let properties = usecase
        .execute(
            &identity,
            PropertyFilter {
                listing_type: query.listing_type,
                state: query.state,
                verification_status: query.verification_status,
                owner_id: query.owner_id,
                city: non_empty(query.city),
                search: non_empty(query.search),
            },
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(properties.into_iter().map(Into::into).collect()))
}

// ── GET /properties/{id} ─────────────────────────────────────────────────────

pub async fn get_property(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyResponse>, AdminError> {
    let usecase = GetPropertyUseCase {
        admins: state.admin_repo(),
        properties: state.property_repo(),
        storage: state.storage.clone(),
    };
    let (property, images) = usecase.execute(&identity, id).await?;
    Ok(Json(PropertyResponse::new(property, Some(images))))
}

// ── PATCH /properties/{id}/availability ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

pub async fn set_availability(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<PropertyResponse>, AdminError> {
    let body = json_body(body)?;
    let usecase = SetPropertyAvailabilityUseCase {
        admins: state.admin_repo(),
        properties: state.property_repo(),
        log: state.activity_repo(),
    };
    Ok(Json(
        usecase
            .execute(&identity, id, body.is_available)
            .await?
            .into(),
    ))
}

// ── DELETE /properties/{id} ──────────────────────────────────────────────────

pub async fn delete_property(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminError> {
    let usecase = DeletePropertyUseCase {
        admins: state.admin_repo(),
        properties: state.property_repo(),
        log: state.activity_repo(),
    };
    usecase.execute(&identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
