use chrono::{DateTime, Utc};
use uuid::Uuid;

use roofline_domain::account::AccountRole;
use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::{ListingState, ListingType};
use roofline_domain::verification::{PaymentStatus, PropertyVerificationStatus, RequestStatus};

/// Number of digits in every OTP (account and WhatsApp).
pub const OTP_LEN: usize = 4;

/// Account OTP validity (signup, resend, password reset).
pub const ACCOUNT_OTP_TTL_SECS: i64 = 600;

/// WhatsApp OTP validity for contact-number verification.
pub const MOBILE_OTP_TTL_SECS: i64 = 300;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Outbox event kinds drained by the delivery worker.
pub const OUTBOX_ACCOUNT_OTP: &str = "account_otp";
pub const OUTBOX_PASSWORD_RESET: &str = "password_reset";
pub const OUTBOX_WHATSAPP_OTP: &str = "whatsapp_otp";

/// A marketplace account (seeker or owner).
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub role: AccountRole,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub otp: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outbound message written in the same transaction as the change that caused it.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// WhatsApp OTP state for one contact number.
#[derive(Debug, Clone)]
pub struct MobileVerification {
    pub id: Uuid,
    pub mobile: String,
    pub otp: String,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Price fields of a listing. Values are kept exactly as the owner typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingTerms {
    Rent {
        rent: String,
        security_deposit: String,
        maintenance: Option<String>,
    },
    Sale {
        sale_price: String,
    },
}

impl ListingTerms {
    pub fn listing_type(&self) -> ListingType {
        match self {
            Self::Rent { .. } => ListingType::Rent,
            Self::Sale { .. } => ListingType::Sale,
        }
    }

    /// Headline price: monthly rent or sale price.
    pub fn price(&self) -> &str {
        match self {
            Self::Rent { rent, .. } => rent,
            Self::Sale { sale_price } => sale_price,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub property_type: String,
    pub title: String,
    pub description: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub city: String,
    pub locality: String,
    pub address: String,
    pub location: Option<GeoPoint>,
    pub contact_number: String,
    pub terms: ListingTerms,
    pub is_draft: bool,
    pub is_available: bool,
    pub is_verified: bool,
    pub verification_status: PropertyVerificationStatus,
    pub verification_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn state(&self) -> ListingState {
        ListingState::from_flags(self.is_draft, self.is_available)
    }

    pub fn summary(&self) -> PropertySummary {
        PropertySummary {
            id: self.id,
            title: self.title.clone(),
            city: self.city.clone(),
            locality: self.locality.clone(),
            listing_type: self.terms.listing_type(),
            price: self.terms.price().to_owned(),
            is_available: self.state().is_live(),
        }
    }
}

/// Compact listing reference embedded in contacts and wishlist entries.
#[derive(Debug, Clone)]
pub struct PropertySummary {
    pub id: Uuid,
    pub title: String,
    pub city: String,
    pub locality: String,
    pub listing_type: ListingType,
    pub price: String,
    pub is_available: bool,
}

/// Partial edit of a listing's form fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdate {
    pub property_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub contact_number: Option<String>,
    pub terms: Option<ListingTerms>,
}

impl PropertyUpdate {
    pub fn is_empty(&self) -> bool {
        self.property_type.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.bhk.is_none()
            && self.furnishing.is_none()
            && self.city.is_none()
            && self.locality.is_none()
            && self.address.is_none()
            && self.location.is_none()
            && self.contact_number.is_none()
            && self.terms.is_none()
    }
}

/// A cooldown-gated change to a listing.
#[derive(Debug, Clone)]
pub enum PropertyChange {
    Fields(PropertyUpdate),
    /// Images were (re)uploaded: a draft leaves draft, other listings keep
    /// their availability.
    ImagesUploaded,
}

impl PropertyChange {
    /// Whether the edit cooldown applies to this change on a listing in the
    /// given draft state. The upload that takes a draft live is not gated, so
    /// a draft whose create-time URLs failed can retry at once.
    pub fn is_cooldown_gated(&self, is_draft: bool) -> bool {
        !matches!(self, Self::ImagesUploaded if is_draft)
    }

    /// Apply the change and reset the cooldown clock.
    pub fn apply(self, property: &mut Property, now: DateTime<Utc>) {
        match self {
            Self::Fields(update) => {
                if let Some(v) = update.property_type {
                    property.property_type = v;
                }
                if let Some(v) = update.title {
                    property.title = v;
                }
                if let Some(v) = update.description {
                    property.description = Some(v);
                }
                if let Some(v) = update.bhk {
                    property.bhk = Some(v);
                }
                if let Some(v) = update.furnishing {
                    property.furnishing = Some(v);
                }
                if let Some(v) = update.city {
                    property.city = v;
                }
                if let Some(v) = update.locality {
                    property.locality = v;
                }
                if let Some(v) = update.address {
                    property.address = v;
                }
                if let Some(v) = update.location {
                    property.location = Some(v);
                }
                if let Some(v) = update.contact_number {
                    property.contact_number = v;
                }
                if let Some(v) = update.terms {
                    property.terms = v;
                }
            }
            Self::ImagesUploaded => {
                if property.is_draft {
                    property.is_draft = false;
                    property.is_available = true;
                }
            }
        }
        property.updated_at = now;
    }
}

/// Result of a cooldown-gated update performed under a row lock.
#[derive(Debug, Clone)]
pub enum CooldownOutcome {
    Updated(Property),
    TooSoon { days_left: i64 },
}

/// Search filters for public listing search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub listing_type: Option<ListingType>,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub property_type: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub verified_only: bool,
}

/// Distinct values among live listings, for search dropdowns.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub localities: Vec<String>,
    pub property_types: Vec<String>,
    pub furnishings: Vec<String>,
    pub bhks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaCount {
    pub city: String,
    pub locality: String,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub id: Uuid,
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub status: RequestStatus,
    pub payment_status: PaymentStatus,
    pub amount: i32,
    pub payment_reference: Option<String>,
    pub location: Option<GeoPoint>,
    pub captured_address: Option<String>,
    pub photo_keys: Vec<String>,
    pub assigned_to: Option<Uuid>,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Location and photo evidence submitted by the owner after payment.
#[derive(Debug, Clone)]
pub struct CaptureLocation {
    pub request_id: Uuid,
    pub property_id: Uuid,
    pub location: GeoPoint,
    pub captured_address: Option<String>,
    pub photo_keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Contact {
    pub id: Uuid,
    pub property_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_phone: String,
    pub message: Option<String>,
    pub user_deleted: bool,
    pub owner_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WishlistItem {
    pub property: PropertySummary,
    pub added_at: DateTime<Utc>,
}

/// Rent-agreement form. All form values are stored verbatim as strings.
#[derive(Debug, Clone)]
pub struct RentAgreement {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub creator_phone: String,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RentAgreement {
    /// Creator, owner and tenant phones grant read access.
    pub fn is_party(&self, phone: &str) -> bool {
        self.creator_phone == phone || self.owner_phone == phone || self.tenant_phone == phone
    }
}
