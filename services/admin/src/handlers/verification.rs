use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::{
    PaymentStatus, PropertyVerificationStatus, RequestStatus, ReviewDecision,
};

use crate::domain::types::{RequestStatusCounts, VerificationRequest};
use crate::error::AdminError;
use crate::handlers::{json_body, parse_query};
use crate::state::AppState;
use crate::usecase::verification::{
    AssignVerificationUseCase, ListVerificationsUseCase, ReviewInput, ReviewVerificationUseCase,
    VerificationStatsUseCase, VerificationView,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub id: String,
    pub property_id: String,
    pub owner_id: String,
    pub status: RequestStatus,
    pub payment_status: PaymentStatus,
    pub amount: i32,
    pub payment_reference: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub captured_address: Option<String>,
    pub photo_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_urls: Option<Vec<Option<String>>>,
    pub assigned_to: Option<String>,
    pub reviewed_by: Option<String>,
    pub review_notes: Option<String>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms_opt")]
    pub valid_from: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms_opt")]
    pub valid_until: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl VerificationResponse {
    fn new(r: VerificationRequest, photo_urls: Option<Vec<Option<String>>>) -> Self {
        Self {
            id: r.id.to_string(),
            property_id: r.property_id.to_string(),
            owner_id: r.owner_id.to_string(),
            status: r.status,
            payment_status: r.payment_status,
            amount: r.amount,
            payment_reference: r.payment_reference,
            latitude: r.location.map(|l| l.lat),
            longitude: r.location.map(|l| l.lon),
            captured_address: r.captured_address,
            photo_keys: r.photo_keys,
            photo_urls,
            assigned_to: r.assigned_to.map(|id| id.to_string()),
            reviewed_by: r.reviewed_by.map(|id| id.to_string()),
            review_notes: r.review_notes,
            valid_from: r.valid_from,
            valid_until: r.valid_until,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<VerificationView> for VerificationResponse {
    fn from(view: VerificationView) -> Self {
        Self::new(view.request, Some(view.photo_urls))
    }
}

impl From<VerificationRequest> for VerificationResponse {
    fn from(r: VerificationRequest) -> Self {
        Self::new(r, None)
    }
}

// ── GET /verifications ───────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListVerificationsQuery {
    pub status: Option<RequestStatus>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_verifications(
    identity: AdminIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<VerificationResponse>>, AdminError> {
    let query: ListVerificationsQuery = parse_query(raw_query)?;
    let usecase = ListVerificationsUseCase {
        admins: state.admin_repo(),
        requests: state.verification_repo(),
        storage: state.storage.clone(),
    };
    let views = usecase
        .execute(
            &identity,
            query.status,
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

// ── GET /verifications/stats ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountsResponse {
    pub pending_payment: u64,
    pub payment_completed: u64,
    pub under_review: u64,
    pub approved: u64,
    pub rejected: u64,
    pub expired: u64,
    pub total: u64,
}

impl From<RequestStatusCounts> for StatusCountsResponse {
    fn from(c: RequestStatusCounts) -> Self {
        Self {
            pending_payment: c.pending_payment,
            payment_completed: c.payment_completed,
            under_review: c.under_review,
            approved: c.approved,
            rejected: c.rejected,
            expired: c.expired,
            total: c.total(),
        }
    }
}

pub async fn verification_stats(
    identity: AdminIdentity,
    State(state): State<AppState>,
) -> Result<Json<StatusCountsResponse>, AdminError> {
    let usecase = VerificationStatsUseCase {
        admins: state.admin_repo(),
        requests: state.verification_repo(),
    };
    Ok(Json(usecase.execute(&identity).await?.into()))
}

// ── POST /verifications/{id}/assign ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub admin_id: Uuid,
}

pub async fn assign_verification(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<VerificationResponse>, AdminError> {
    let body = json_body(body)?;
    let usecase = AssignVerificationUseCase {
        admins: state.admin_repo(),
        requests: state.verification_repo(),
        log: state.activity_repo(),
    };
    Ok(Json(usecase.execute(&identity, id, body.admin_id).await?.into()))
}

// ── POST /verifications/{id}/review ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub status: ReviewDecision,
    pub review_notes: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub request: VerificationResponse,
    pub property_verification_status: PropertyVerificationStatus,
}

pub async fn review_verification(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewResponse>, AdminError> {
    let body = json_body(body)?;
    let usecase = ReviewVerificationUseCase {
        admins: state.admin_repo(),
        requests: state.verification_repo(),
        log: state.activity_repo(),
        validity_days: state.settings.validity_days,
    };
    let reviewed = usecase
        .execute(
            &identity,
            id,
            ReviewInput {
                decision: body.status,
                notes: body.review_notes,
            },
        )
        .await?;
    Ok(Json(ReviewResponse {
        request: reviewed.request.into(),
        property_verification_status: reviewed.property_status,
    }))
}
