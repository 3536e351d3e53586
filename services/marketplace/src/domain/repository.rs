#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use roofline_domain::account::AccountRole;
use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::ListingType;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::PaymentStatus;

use crate::domain::agreement_template::AgreementDocument;
use crate::domain::types::{
    Account, AreaCount, CaptureLocation, Contact, CooldownOutcome, FilterOptions,
    MobileVerification, OutboxEvent, Property, PropertyChange, PropertySummary, RentAgreement,
    SearchFilter, VerificationRequest, WishlistItem,
};
use crate::error::MarketplaceError;

/// Repository for seeker and owner accounts.
pub trait AccountRepository: Send + Sync {
    async fn find_by_phone(
        &self,
        role: AccountRole,
        phone: &str,
    ) -> Result<Option<Account>, MarketplaceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, MarketplaceError>;

    /// `true` when the phone or email is already registered for `role`.
    async fn exists(
        &self,
        role: AccountRole,
        phone: &str,
        email: &str,
    ) -> Result<bool, MarketplaceError>;

    /// Insert the account and its OTP outbox event in one transaction.
    /// A lost race on the unique indexes surfaces as `AccountAlreadyExists`.
    async fn create_with_outbox(
        &self,
        account: &Account,
        event: &OutboxEvent,
    ) -> Result<(), MarketplaceError>;

    /// Store a fresh OTP and its outbox event in one transaction.
    async fn store_otp_with_outbox(
        &self,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<(), MarketplaceError>;

    /// Set `is_verified` and clear the OTP.
    async fn mark_verified(&self, id: Uuid) -> Result<(), MarketplaceError>;

    /// Replace the password hash and clear the OTP.
    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), MarketplaceError>;

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), MarketplaceError>;
}

/// Repository for WhatsApp OTP state.
pub trait MobileVerificationRepository: Send + Sync {
    /// Insert or overwrite the row for `record.mobile` and write the outbox event.
    async fn upsert_with_outbox(
        &self,
        record: &MobileVerification,
        event: &OutboxEvent,
    ) -> Result<(), MarketplaceError>;

    async fn find_by_mobile(
        &self,
        mobile: &str,
    ) -> Result<Option<MobileVerification>, MarketplaceError>;

    async fn mark_verified(&self, mobile: &str) -> Result<(), MarketplaceError>;
}

/// Repository for property listings.
pub trait PropertyRepository: Send + Sync {
    async fn create(&self, property: &Property) -> Result<(), MarketplaceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, MarketplaceError>;

    /// Owner's listings excluding soft-deleted ones, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Property>, MarketplaceError>;

    /// Flip availability. Leaves `updated_at` alone so the cooldown clock is unaffected.
    async fn set_available(&self, id: Uuid, available: bool) -> Result<(), MarketplaceError>;

    /// Apply `change` under a row lock if the cooldown has elapsed.
    /// `None` when the row no longer exists.
    async fn update_with_cooldown(
        &self,
        id: Uuid,
        change: PropertyChange,
        cooldown_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<CooldownOutcome>, MarketplaceError>;

    /// Make the listing live.
    async fn publish(&self, id: Uuid) -> Result<(), MarketplaceError>;

    async fn soft_delete(&self, id: Uuid) -> Result<(), MarketplaceError>;

    /// Flip an expired verification: property to `EXPIRED` and the active
    /// verification row deactivated, in one transaction.
    async fn expire_verification(&self, id: Uuid) -> Result<(), MarketplaceError>;

    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<Vec<Property>, MarketplaceError>;

    /// Live listings that carry coordinates, for the near-me scan.
    async fn list_live_located(
        &self,
        listing_type: Option<ListingType>,
    ) -> Result<Vec<Property>, MarketplaceError>;

    async fn filter_options(&self) -> Result<FilterOptions, MarketplaceError>;

    async fn available_areas(&self) -> Result<Vec<AreaCount>, MarketplaceError>;
}

/// Repository for owner-side verification requests.
pub trait VerificationRepository: Send + Sync {
    async fn find_in_flight(
        &self,
        property_id: Uuid,
    ) -> Result<Option<VerificationRequest>, MarketplaceError>;

    /// A lost race on the one-in-flight index surfaces as `VerificationInFlight`.
    async fn create(&self, request: &VerificationRequest) -> Result<(), MarketplaceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationRequest>, MarketplaceError>;

    async fn complete_payment(
        &self,
        id: Uuid,
        reference: Option<&str>,
    ) -> Result<(), MarketplaceError>;

    /// Store location and photos, advance to `UNDER_REVIEW` and mark the property
    /// `PENDING_VERIFICATION`, in one transaction.
    async fn capture_location(&self, capture: &CaptureLocation) -> Result<(), MarketplaceError>;

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<VerificationRequest>, MarketplaceError>;

    async fn latest_for_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<VerificationRequest>, MarketplaceError>;
}

/// Repository for seeker-to-owner contacts. Rows are never hard-deleted.
pub trait ContactRepository: Send + Sync {
    async fn find_for_user(
        &self,
        user_id: Uuid,
        property_id: Uuid,
    ) -> Result<Option<Contact>, MarketplaceError>;

    async fn create(&self, contact: &Contact) -> Result<(), MarketplaceError>;

    /// Clear `user_deleted` so a repeated contact shows up again for the seeker.
    async fn restore_for_user(&self, id: Uuid) -> Result<(), MarketplaceError>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError>;

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError>;

    /// Returns `true` if a visible contact of `user_id` was hidden.
    async fn hide_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, MarketplaceError>;

    /// Returns `true` if a visible lead on one of `owner_id`'s properties was hidden.
    async fn hide_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<bool, MarketplaceError>;
}

pub trait WishlistRepository: Send + Sync {
    /// Returns `true` if the entry was inserted, `false` if it already existed.
    async fn add(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, MarketplaceError>;

    /// Returns `true` if a row was deleted.
    async fn remove(&self, user_id: Uuid, property_id: Uuid) -> Result<bool, MarketplaceError>;

    async fn list(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, MarketplaceError>;
}

pub trait AgreementRepository: Send + Sync {
    async fn create(&self, agreement: &RentAgreement) -> Result<(), MarketplaceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentAgreement>, MarketplaceError>;

    /// Agreements where `phone` is the creator, owner or tenant, newest first.
    async fn list_for_phone(&self, phone: &str) -> Result<Vec<RentAgreement>, MarketplaceError>;

    async fn update_payment(
        &self,
        id: Uuid,
        status: PaymentStatus,
        reference: Option<&str>,
    ) -> Result<(), MarketplaceError>;

    async fn mark_document_generated(&self, id: Uuid) -> Result<(), MarketplaceError>;
}

/// Port for turning coordinates into a human-readable address.
pub trait Geocoder: Send + Sync {
    async fn reverse(&self, point: GeoPoint) -> anyhow::Result<Option<String>>;
}

/// Port for rendering an agreement document to PDF bytes.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, document: &AgreementDocument) -> anyhow::Result<Vec<u8>>;
}
