use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::PaymentStatus;

use crate::domain::types::{AgreementFilter, AgreementRecord};
use crate::error::AdminError;
use crate::handlers::{json_body, non_empty, parse_query};
use crate::state::AppState;
use crate::usecase::agreement::{ListAgreementsUseCase, UpdateAgreementPaymentUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementSummaryResponse {
    pub id: String,
    pub creator_id: String,
    pub creator_phone: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub property_address: String,
    pub rent_amount: String,
    pub agreement_duration: String,
    pub rent_start_date: String,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub document_generated: bool,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AgreementRecord> for AgreementSummaryResponse {
    fn from(a: AgreementRecord) -> Self {
        Self {
            id: a.id.to_string(),
            creator_id: a.creator_id.to_string(),
            creator_phone: a.creator_phone,
            owner_name: a.owner_name,
            owner_phone: a.owner_phone,
            tenant_name: a.tenant_name,
            tenant_phone: a.tenant_phone,
            property_address: a.property_address,
            rent_amount: a.rent_amount,
            agreement_duration: a.agreement_duration,
            rent_start_date: a.rent_start_date,
            payment_status: a.payment_status,
            payment_reference: a.payment_reference,
            document_generated: a.document_generated,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// ── GET /rent-agreements ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListAgreementsQuery {
    pub payment_status: Option<PaymentStatus>,
    pub phone: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_agreements(
    identity: AdminIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<AgreementSummaryResponse>>, AdminError> {
    let query: ListAgreementsQuery = parse_query(raw_query)?;
    let usecase = ListAgreementsUseCase {
        admins: state.admin_repo(),
        agreements: state.agreement_repo(),
    };
    let agreements = usecase
        .execute(
            &identity,
            AgreementFilter {
                payment_status: query.payment_status,
                phone: non_empty(query.phone).map(|p| p.trim().to_owned()),
            },
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(agreements.into_iter().map(Into::into).collect()))
}

// ── PATCH /rent-agreements/{id}/payment ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
}

pub async fn update_payment(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdatePaymentRequest>, JsonRejection>,
) -> Result<Json<AgreementSummaryResponse>, AdminError> {
    let body = json_body(body)?;
    let usecase = UpdateAgreementPaymentUseCase {
        admins: state.admin_repo(),
        agreements: state.agreement_repo(),
        log: state.activity_repo(),
    };
    let agreement = usecase
        .execute(&identity, id, body.payment_status, body.payment_reference)
        .await?;
    Ok(Json(agreement.into()))
}
