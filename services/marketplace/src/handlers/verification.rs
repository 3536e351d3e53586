use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::OwnerIdentity;
use roofline_domain::geo::GeoPoint;
use roofline_domain::verification::{PaymentStatus, PropertyVerificationStatus, RequestStatus};
use roofline_storage::UploadUrl;

use crate::domain::types::VerificationRequest;
use crate::error::MarketplaceError;
use crate::handlers::ensure_active;
use crate::state::AppState;
use crate::usecase::verification::{
    CaptureLocationInput, CaptureLocationUseCase, CompletePaymentUseCase,
    InitiateVerificationUseCase, ListVerificationRequestsUseCase, PhotoUploadUrlsUseCase,
    VerificationStatusUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequestResponse {
    pub id: String,
    pub property_id: String,
    pub status: RequestStatus,
    pub payment_status: PaymentStatus,
    pub amount: i32,
    pub payment_reference: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub captured_address: Option<String>,
    pub photo_keys: Vec<String>,
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

impl From<VerificationRequest> for VerificationRequestResponse {
    fn from(r: VerificationRequest) -> Self {
        Self {
            id: r.id.to_string(),
            property_id: r.property_id.to_string(),
            status: r.status,
            payment_status: r.payment_status,
            amount: r.amount,
            payment_reference: r.payment_reference,
            latitude: r.location.map(|l| l.lat),
            longitude: r.location.map(|l| l.lon),
            captured_address: r.captured_address,
            photo_keys: r.photo_keys,
            review_notes: r.review_notes,
            valid_from: r.valid_from,
            valid_until: r.valid_until,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── POST /verification/initiate ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateRequest {
    pub property_id: Uuid,
}

pub async fn initiate(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Json(body): Json<InitiateRequest>,
) -> Result<(StatusCode, Json<VerificationRequestResponse>), MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = InitiateVerificationUseCase {
        properties: state.property_repo(),
        requests: state.verification_repo(),
        fee: state.settings.verification_fee,
    };
    let request = usecase.execute(identity.account_id, body.property_id).await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}

// ── POST /verification/payment/complete ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePaymentRequest {
    pub request_id: Uuid,
    pub payment_reference: Option<String>,
}

pub async fn complete_payment(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Json(body): Json<CompletePaymentRequest>,
) -> Result<Json<VerificationRequestResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = CompletePaymentUseCase {
        requests: state.verification_repo(),
    };
    let request = usecase
        .execute(identity.account_id, body.request_id, body.payment_reference)
        .await?;
    Ok(Json(request.into()))
}

// ── POST /verification/capture-location ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureLocationRequest {
    pub request_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_keys: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureLocationResponse {
    pub request_id: String,
    pub status: RequestStatus,
    pub captured_address: Option<String>,
    pub photo_keys: Vec<String>,
}

pub async fn capture_location(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Json(body): Json<CaptureLocationRequest>,
) -> Result<Json<CaptureLocationResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = CaptureLocationUseCase {
        requests: state.verification_repo(),
        geocoder: state.geocoder.clone(),
    };
    let capture = usecase
        .execute(
            identity.account_id,
            CaptureLocationInput {
                request_id: body.request_id,
                location: GeoPoint::new(body.latitude, body.longitude),
                photo_keys: body.photo_keys,
            },
        )
        .await?;
    Ok(Json(CaptureLocationResponse {
        request_id: capture.request_id.to_string(),
        status: RequestStatus::UnderReview,
        captured_address: capture.captured_address,
        photo_keys: capture.photo_keys,
    }))
}

// ── POST /verification/photo-upload-urls ─────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploadUrlsRequest {
    pub request_id: Uuid,
    pub count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploadUrlsResponse {
    pub upload_urls: Vec<UploadUrl>,
}

pub async fn photo_upload_urls(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Json(body): Json<PhotoUploadUrlsRequest>,
) -> Result<Json<PhotoUploadUrlsResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = PhotoUploadUrlsUseCase {
        requests: state.verification_repo(),
        storage: state.storage.clone(),
    };
    let upload_urls = usecase
        .execute(identity.account_id, body.request_id, body.count)
        .await?;
    Ok(Json(PhotoUploadUrlsResponse { upload_urls }))
}

// ── GET /verification/status/{propertyId} ────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatusResponse {
    pub property_id: String,
    pub verification_status: PropertyVerificationStatus,
    pub is_verified: bool,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms_opt")]
    pub verification_expiry: Option<chrono::DateTime<chrono::Utc>>,
    pub latest_request: Option<VerificationRequestResponse>,
}

pub async fn status(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Result<Json<VerificationStatusResponse>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = VerificationStatusUseCase {
        properties: state.property_repo(),
        requests: state.verification_repo(),
    };
    let view = usecase.execute(identity.account_id, property_id).await?;
    Ok(Json(VerificationStatusResponse {
        property_id: view.property_id.to_string(),
        verification_status: view.status,
        is_verified: view.is_verified,
        verification_expiry: view.expires_at,
        latest_request: view.latest_request.map(Into::into),
    }))
}

// ── GET /verification/requests ───────────────────────────────────────────────

pub async fn list_requests(
    OwnerIdentity(identity): OwnerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<VerificationRequestResponse>>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ListVerificationRequestsUseCase {
        requests: state.verification_repo(),
    };
    let requests = usecase.execute(identity.account_id).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}
