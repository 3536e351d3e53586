use chrono::{DateTime, Utc};
use uuid::Uuid;

use roofline_domain::geo::GeoPoint;
use roofline_domain::verification::{
    MAX_VERIFICATION_PHOTOS, PaymentStatus, PropertyVerificationStatus, RequestStatus,
    photo_key_prefix, photo_object_key,
};
use roofline_storage::{ObjectStorage, UploadUrl, issue_put_urls};

use crate::domain::repository::{Geocoder, PropertyRepository, VerificationRepository};
use crate::domain::types::{CaptureLocation, VerificationRequest};
use crate::error::MarketplaceError;
use crate::usecase::expiry::refresh_expiry;
use crate::usecase::property::load_owned;

async fn load_own_request<V: VerificationRepository>(
    repo: &V,
    request_id: Uuid,
    owner_id: Uuid,
) -> Result<VerificationRequest, MarketplaceError> {
    let request = repo
        .find_by_id(request_id)
        .await?
        .ok_or(MarketplaceError::RequestNotFound)?;
    if request.owner_id != owner_id {
        return Err(MarketplaceError::Forbidden);
    }
    Ok(request)
}

fn require_paid(request: &VerificationRequest) -> Result<(), MarketplaceError> {
    if request.payment_status != PaymentStatus::Completed
        || request.status != RequestStatus::PaymentCompleted
    {
        return Err(MarketplaceError::InvalidState(
            "payment must be completed before capturing location",
        ));
    }
    Ok(())
}

// ── Initiate ─────────────────────────────────────────────────────────────────

pub struct InitiateVerificationUseCase<P: PropertyRepository, V: VerificationRepository> {
    pub properties: P,
    pub requests: V,
    pub fee: i32,
}

impl<P: PropertyRepository, V: VerificationRepository> InitiateVerificationUseCase<P, V> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        property_id: Uuid,
    ) -> Result<VerificationRequest, MarketplaceError> {
        load_owned(&self.properties, property_id, owner_id).await?;
        if self.requests.find_in_flight(property_id).await?.is_some() {
            return Err(MarketplaceError::VerificationInFlight);
        }
        let now = Utc::now();
        let request = VerificationRequest {
            id: Uuid::now_v7(),
            property_id,
            owner_id,
            status: RequestStatus::PendingPayment,
            payment_status: PaymentStatus::Pending,
            amount: self.fee,
            payment_reference: None,
            location: None,
            captured_address: None,
            photo_keys: Vec::new(),
            assigned_to: None,
            reviewed_by: None,
            review_notes: None,
            valid_from: None,
            valid_until: None,
            created_at: now,
            updated_at: now,
        };
        self.requests.create(&request).await?;
        tracing::info!(request_id = %request.id, %property_id, "verification initiated");
        Ok(request)
    }
}

// ── CompletePayment ──────────────────────────────────────────────────────────

pub struct CompletePaymentUseCase<V: VerificationRepository> {
    pub requests: V,
}

impl<V: VerificationRepository> CompletePaymentUseCase<V> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        request_id: Uuid,
        reference: Option<String>,
    ) -> Result<VerificationRequest, MarketplaceError> {
        let mut request = load_own_request(&self.requests, request_id, owner_id).await?;
        if request.payment_status == PaymentStatus::Completed {
            return Err(MarketplaceError::PaymentAlreadyCompleted);
        }
        if !request.status.can_advance_to(RequestStatus::PaymentCompleted) {
            return Err(MarketplaceError::InvalidState(
                "request is not awaiting payment",
            ));
        }
        self.requests
            .complete_payment(request_id, reference.as_deref())
            .await?;
        request.payment_status = PaymentStatus::Completed;
        request.status = RequestStatus::PaymentCompleted;
        request.payment_reference = reference;
        Ok(request)
    }
}

// ── CaptureLocation ──────────────────────────────────────────────────────────

pub struct CaptureLocationInput {
    pub request_id: Uuid,
    pub location: GeoPoint,
    pub photo_keys: Vec<String>,
}

pub struct CaptureLocationUseCase<V: VerificationRepository, G: Geocoder> {
    pub requests: V,
    pub geocoder: G,
}

impl<V: VerificationRepository, G: Geocoder> CaptureLocationUseCase<V, G> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        input: CaptureLocationInput,
    ) -> Result<CaptureLocation, MarketplaceError> {
        let request = load_own_request(&self.requests, input.request_id, owner_id).await?;
        require_paid(&request)?;
        if !input.location.is_valid() {
            return Err(MarketplaceError::Validation(
                "latitude/longitude: out of range".to_owned(),
            ));
        }
        if input.photo_keys.is_empty() || input.photo_keys.len() > MAX_VERIFICATION_PHOTOS {
            return Err(MarketplaceError::Validation(format!(
                "photoKeys: between 1 and {MAX_VERIFICATION_PHOTOS} photos are required"
            )));
        }
        let prefix = photo_key_prefix(request.id);
        if let Some(bad) = input.photo_keys.iter().find(|k| !k.starts_with(&prefix)) {
            return Err(MarketplaceError::Validation(format!(
                "photoKeys: {bad} is not under {prefix}"
            )));
        }

        let captured_address = match self.geocoder.reverse(input.location).await {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!(error = %e, request_id = %request.id, "reverse geocoding failed");
                None
            }
        };
        let capture = CaptureLocation {
            request_id: request.id,
            property_id: request.property_id,
            location: input.location,
            captured_address,
            photo_keys: input.photo_keys,
        };
        self.requests.capture_location(&capture).await?;
        Ok(capture)
    }
}

// ── PhotoUploadUrls ──────────────────────────────────────────────────────────

pub struct PhotoUploadUrlsUseCase<V: VerificationRepository, S: ObjectStorage> {
    pub requests: V,
    pub storage: S,
}

impl<V: VerificationRepository, S: ObjectStorage> PhotoUploadUrlsUseCase<V, S> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        request_id: Uuid,
        count: usize,
    ) -> Result<Vec<UploadUrl>, MarketplaceError> {
        if count == 0 || count > MAX_VERIFICATION_PHOTOS {
            return Err(MarketplaceError::Validation(format!(
                "count: must be between 1 and {MAX_VERIFICATION_PHOTOS}"
            )));
        }
        let request = load_own_request(&self.requests, request_id, owner_id).await?;
        require_paid(&request)?;
        let keys = (1..=count).map(|i| photo_object_key(request.id, i)).collect();
        Ok(issue_put_urls(&self.storage, keys).await?)
    }
}

// ── Status / Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct VerificationStatusView {
    pub property_id: Uuid,
    pub status: PropertyVerificationStatus,
    pub is_verified: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub latest_request: Option<VerificationRequest>,
}

pub struct VerificationStatusUseCase<P: PropertyRepository, V: VerificationRepository> {
    pub properties: P,
    pub requests: V,
}

impl<P: PropertyRepository, V: VerificationRepository> VerificationStatusUseCase<P, V> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        property_id: Uuid,
    ) -> Result<VerificationStatusView, MarketplaceError> {
        let property = load_owned(&self.properties, property_id, owner_id).await?;
        let property = refresh_expiry(&self.properties, property, Utc::now()).await?;
        let latest_request = self.requests.latest_for_property(property_id).await?;
        Ok(VerificationStatusView {
            property_id,
            status: property.verification_status,
            is_verified: property.is_verified,
            expires_at: property.verification_expiry,
            latest_request,
        })
    }
}

pub struct ListVerificationRequestsUseCase<V: VerificationRepository> {
    pub requests: V,
}

impl<V: VerificationRepository> ListVerificationRequestsUseCase<V> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<VerificationRequest>, MarketplaceError> {
        self.requests.list_by_owner(owner_id).await
    }
}
