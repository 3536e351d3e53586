use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::{OwnerIdentity, UserIdentity};
use roofline_domain::listing::ListingType;

use crate::domain::types::{Contact, PropertySummary};
use crate::error::MarketplaceError;
use crate::handlers::ensure_active;
use crate::state::AppState;
use crate::usecase::contact::{
    ContactOwnerUseCase, ContactSide, DeleteContactUseCase, ListLeadsUseCase,
    ListMyContactsUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummaryResponse {
    pub id: String,
    pub title: String,
    pub city: String,
    pub locality: String,
    pub listing_type: ListingType,
    pub price: String,
    pub is_available: bool,
}

impl From<PropertySummary> for PropertySummaryResponse {
    fn from(s: PropertySummary) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title,
            city: s.city,
            locality: s.locality,
            listing_type: s.listing_type,
            price: s.price,
            is_available: s.is_available,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: String,
    pub property_id: String,
    pub user_name: String,
    pub user_phone: String,
    pub message: Option<String>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertySummaryResponse>,
}

impl ContactResponse {
    fn new(c: Contact, property: Option<PropertySummary>) -> Self {
        Self {
            id: c.id.to_string(),
            property_id: c.property_id.to_string(),
            user_name: c.user_name,
            user_phone: c.user_phone,
            message: c.message,
            created_at: c.created_at,
            property: property.map(Into::into),
        }
    }
}

// ── POST /user/contacts ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactOwnerRequest {
    pub property_id: Uuid,
    pub message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactOwnerResponse {
    pub contact: ContactResponse,
    pub owner_contact_number: String,
}

pub async fn contact_owner(
    UserIdentity(identity): UserIdentity,
    State(state): State<AppState>,
    Json(body): Json<ContactOwnerRequest>,
) -> Result<Json<ContactOwnerResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ContactOwnerUseCase {
        contacts: state.contact_repo(),
        properties: state.property_repo(),
        accounts: state.account_repo(),
    };
    let message = body.message.filter(|m| !m.trim().is_empty());
    let (contact, owner_contact_number) = usecase
        .execute(identity.account_id, body.property_id, message)
        .await?;
    Ok(Json(ContactOwnerResponse {
        contact: ContactResponse::new(contact, None),
        owner_contact_number,
    }))
}

// ── GET /user/contacts ───────────────────────────────────────────────────────

pub async fn my_contacts(
    UserIdentity(identity): UserIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactResponse>>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ListMyContactsUseCase {
        contacts: state.contact_repo(),
    };
    let rows = usecase.execute(identity.account_id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(c, p)| ContactResponse::new(c, Some(p)))
            .collect(),
    ))
}

// ── DELETE /user/contacts/{id} ───────────────────────────────────────────────

pub async fn delete_my_contact(
    UserIdentity(identity): UserIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = DeleteContactUseCase {
        contacts: state.contact_repo(),
        side: ContactSide::User,
    };
    usecase.execute(identity.account_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /owner/leads ─────────────────────────────────────────────────────────

pub async fn leads(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactResponse>>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ListLeadsUseCase {
        contacts: state.contact_repo(),
    };
    let rows = usecase.execute(identity.account_id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(c, p)| ContactResponse::new(c, Some(p)))
            .collect(),
    ))
}

// ── DELETE /owner/leads/{id} ─────────────────────────────────────────────────

pub async fn delete_lead(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = DeleteContactUseCase {
        contacts: state.contact_repo(),
        side: ContactSide::Owner,
    };
    usecase.execute(identity.account_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
