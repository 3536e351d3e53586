use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::AccountIdentity;
use roofline_domain::verification::PaymentStatus;

use crate::domain::types::RentAgreement;
use crate::error::MarketplaceError;
use crate::handlers::ensure_active;
use crate::state::AppState;
use crate::usecase::agreement::{
    AgreementForm, CreateAgreementUseCase, DownloadAgreementUseCase, GetAgreementUseCase,
    ListAgreementsUseCase, MarkDocumentGeneratedUseCase, UpdateAgreementPaymentUseCase,
    validate_form,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementResponse {
    pub id: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_address: String,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub tenant_address: String,
    pub property_address: String,
    pub rent_amount: String,
    pub security_deposit: String,
    pub maintenance: Option<String>,
    pub agreement_duration: String,
    pub rent_start_date: String,
    pub lock_in_period: String,
    pub notice_period: String,
    pub rent_due_day: String,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub document_generated: bool,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<RentAgreement> for AgreementResponse {
    fn from(a: RentAgreement) -> Self {
        Self {
            id: a.id.to_string(),
            owner_name: a.owner_name,
            owner_phone: a.owner_phone,
            owner_address: a.owner_address,
            tenant_name: a.tenant_name,
            tenant_phone: a.tenant_phone,
            tenant_address: a.tenant_address,
            property_address: a.property_address,
            rent_amount: a.rent_amount,
            security_deposit: a.security_deposit,
            maintenance: a.maintenance,
            agreement_duration: a.agreement_duration,
            rent_start_date: a.rent_start_date,
            lock_in_period: a.lock_in_period,
            notice_period: a.notice_period,
            rent_due_day: a.rent_due_day,
            payment_status: a.payment_status,
            payment_reference: a.payment_reference,
            document_generated: a.document_generated,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// ── POST /rent-agreements ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgreementRequest {
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub owner_phone: String,
    #[serde(default)]
    pub owner_address: String,
    #[serde(default)]
    pub tenant_name: String,
    #[serde(default)]
    pub tenant_phone: String,
    #[serde(default)]
    pub tenant_address: String,
    #[serde(default)]
    pub property_address: String,
    #[serde(default)]
    pub rent_amount: String,
    #[serde(default)]
    pub security_deposit: String,
    pub maintenance: Option<String>,
    #[serde(default)]
    pub agreement_duration: String,
    #[serde(default)]
    pub rent_start_date: String,
    #[serde(default)]
    pub lock_in_period: String,
    #[serde(default)]
    pub notice_period: String,
    #[serde(default)]
    pub rent_due_day: String,
}

pub async fn create_agreement(
    identity: AccountIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateAgreementRequest>,
) -> Result<(StatusCode, Json<AgreementResponse>), MarketplaceError> {
    let form = AgreementForm {
        owner_name: body.owner_name,
        owner_phone: body.owner_phone,
        owner_address: body.owner_address,
        tenant_name: body.tenant_name,
        tenant_phone: body.tenant_phone,
        tenant_address: body.tenant_address,
        property_address: body.property_address,
        rent_amount: body.rent_amount,
        security_deposit: body.security_deposit,
        maintenance: body.maintenance,
        agreement_duration: body.agreement_duration,
        rent_start_date: body.rent_start_date,
        lock_in_period: body.lock_in_period,
        notice_period: body.notice_period,
        rent_due_day: body.rent_due_day,
    };
    validate_form(&form)?;
    ensure_active(&state, &identity).await?;
    let usecase = CreateAgreementUseCase {
        agreements: state.agreement_repo(),
        accounts: state.account_repo(),
    };
    let agreement = usecase.execute(identity.account_id, form).await?;
    Ok((StatusCode::CREATED, Json(agreement.into())))
}

// ── GET /rent-agreements ─────────────────────────────────────────────────────

pub async fn list_agreements(
    identity: AccountIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<AgreementResponse>>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ListAgreementsUseCase {
        agreements: state.agreement_repo(),
        accounts: state.account_repo(),
    };
    let agreements = usecase.execute(identity.account_id).await?;
    Ok(Json(agreements.into_iter().map(Into::into).collect()))
}

// ── GET /rent-agreements/{id} ────────────────────────────────────────────────

pub async fn get_agreement(
    identity: AccountIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AgreementResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = GetAgreementUseCase {
        agreements: state.agreement_repo(),
        accounts: state.account_repo(),
    };
    Ok(Json(usecase.execute(identity.account_id, id).await?.into()))
}

// ── GET /rent-agreements/{id}/download ───────────────────────────────────────

pub async fn download_agreement(
    identity: AccountIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = DownloadAgreementUseCase {
        agreements: state.agreement_repo(),
        accounts: state.account_repo(),
        renderer: state.pdf_renderer(),
    };
    let rendered = usecase.execute(identity.account_id, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", rendered.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    ))
}

// ── PATCH /rent-agreements/{id}/payment ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
}

pub async fn update_payment(
    identity: AccountIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePaymentRequest>,
) -> Result<Json<AgreementResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = UpdateAgreementPaymentUseCase {
        agreements: state.agreement_repo(),
        accounts: state.account_repo(),
    };
    let agreement = usecase
        .execute(
            identity.account_id,
            id,
            body.payment_status,
            body.payment_reference,
        )
        .await?;
    Ok(Json(agreement.into()))
}

// ── PATCH /rent-agreements/{id}/document ─────────────────────────────────────

pub async fn mark_document_generated(
    identity: AccountIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = MarkDocumentGeneratedUseCase {
        agreements: state.agreement_repo(),
        accounts: state.account_repo(),
    };
    usecase.execute(identity.account_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
