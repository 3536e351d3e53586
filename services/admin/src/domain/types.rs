use chrono::{DateTime, Utc};
use uuid::Uuid;

use roofline_domain::account::{AccountRole, AdminRole, Permission, PermissionSet, admin_allows};
use roofline_domain::geo::GeoPoint;
use roofline_domain::listing::{ListingState, ListingType};
use roofline_domain::verification::{PaymentStatus, PropertyVerificationStatus, RequestStatus};

pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;

/// A staff member with their stored permission flags.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub permissions: PermissionSet,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn effective_permissions(&self) -> PermissionSet {
        self.permissions.effective(self.role)
    }

    pub fn allows(&self, permission: Permission) -> bool {
        admin_allows(self.role, &self.permissions, permission)
    }

    pub fn is_main_admin(&self) -> bool {
        self.role == AdminRole::MainAdmin
    }
}

// ── Activity log ─────────────────────────────────────────────────────────────

/// Privileged mutations recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateEmployee,
    UpdatePermissions,
    UpdateEmployeeStatus,
    AssignVerification,
    ReviewVerification,
    UpdateAccountStatus,
    DeleteAccount,
    UpdatePropertyAvailability,
    DeleteProperty,
    UpdateAgreementPayment,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateEmployee => "CREATE_EMPLOYEE",
            Self::UpdatePermissions => "UPDATE_PERMISSIONS",
            Self::UpdateEmployeeStatus => "UPDATE_EMPLOYEE_STATUS",
            Self::AssignVerification => "ASSIGN_VERIFICATION",
            Self::ReviewVerification => "REVIEW_VERIFICATION",
            Self::UpdateAccountStatus => "UPDATE_ACCOUNT_STATUS",
            Self::DeleteAccount => "DELETE_ACCOUNT",
            Self::UpdatePropertyAvailability => "UPDATE_PROPERTY_AVAILABILITY",
            Self::DeleteProperty => "DELETE_PROPERTY",
            Self::UpdateAgreementPayment => "UPDATE_AGREEMENT_PAYMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Admin,
    Account,
    Property,
    VerificationRequest,
    RentAgreement,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Account => "account",
            Self::Property => "property",
            Self::VerificationRequest => "verification_request",
            Self::RentAgreement => "rent_agreement",
        }
    }
}

/// One row of the append-only activity log.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(
        admin_id: Uuid,
        action: Action,
        entity: EntityKind,
        entity_id: Option<Uuid>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            admin_id,
            action: action.as_str().to_owned(),
            entity_type: entity.as_str().to_owned(),
            entity_id,
            details,
            created_at: Utc::now(),
        }
    }
}

// ── Verification ─────────────────────────────────────────────────────────────

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

/// Which verification requests an admin may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationScope {
    All,
    /// Unassigned requests plus those assigned to this admin.
    VisibleTo(Uuid),
}

impl VerificationScope {
    pub fn for_admin(admin: &Admin) -> Self {
        if admin.is_main_admin() {
            Self::All
        } else {
            Self::VisibleTo(admin.id)
        }
    }

    pub fn includes(&self, request: &VerificationRequest) -> bool {
        match self {
            Self::All => true,
            Self::VisibleTo(admin_id) => {
                request.assigned_to.is_none() || request.assigned_to == Some(*admin_id)
            }
        }
    }
}

/// Writes performed together when a request is approved.
#[derive(Debug, Clone)]
pub struct Approval {
    pub request_id: Uuid,
    pub property_id: Uuid,
    pub reviewer_id: Uuid,
    pub notes: Option<String>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

/// Writes performed together when a request is rejected.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub request_id: Uuid,
    pub property_id: Uuid,
    pub reviewer_id: Uuid,
    pub notes: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Request counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestStatusCounts {
    pub pending_payment: u64,
    pub payment_completed: u64,
    pub under_review: u64,
    pub approved: u64,
    pub rejected: u64,
    pub expired: u64,
}

impl RequestStatusCounts {
    pub fn add(&mut self, status: RequestStatus, count: u64) {
        let slot = match status {
            RequestStatus::PendingPayment => &mut self.pending_payment,
            RequestStatus::PaymentCompleted => &mut self.payment_completed,
            RequestStatus::UnderReview => &mut self.under_review,
            RequestStatus::Approved => &mut self.approved,
            RequestStatus::Rejected => &mut self.rejected,
            RequestStatus::Expired => &mut self.expired,
        };
        *slot += count;
    }

    pub fn total(&self) -> u64 {
        self.pending_payment
            + self.payment_completed
            + self.under_review
            + self.approved
            + self.rejected
            + self.expired
    }
}

// ── Accounts ─────────────────────────────────────────────────────────────────

/// Marketplace account as seen by moderators. Credentials are never loaded.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: Uuid,
    pub role: AccountRole,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub role: Option<AccountRole>,
    /// Case-insensitive match on name, email or phone.
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

// ── Properties ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub listing_type: ListingType,
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
    pub rent: Option<String>,
    pub security_deposit: Option<String>,
    pub maintenance: Option<String>,
    pub sale_price: Option<String>,
    pub is_draft: bool,
    pub is_available: bool,
    pub is_verified: bool,
    pub verification_status: PropertyVerificationStatus,
    pub verification_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyRecord {
    pub fn state(&self) -> ListingState {
        ListingState::from_flags(self.is_draft, self.is_available)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub listing_type: Option<ListingType>,
    pub state: Option<ListingState>,
    pub verification_status: Option<PropertyVerificationStatus>,
    pub owner_id: Option<Uuid>,
    /// Case-insensitive match on city.
    pub city: Option<String>,
    /// Case-insensitive match on title, locality or address.
    pub search: Option<String>,
}

// ── Rent agreements ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AgreementRecord {
    pub id: Uuid,
    pub creator_id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct AgreementFilter {
    pub payment_status: Option<PaymentStatus>,
    /// Matches the creator, owner or tenant phone exactly.
    pub phone: Option<String>,
}

// ── Dashboard ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentStatusCounts {
    pub pending: u64,
    pub completed: u64,
    pub failed: u64,
}

impl PaymentStatusCounts {
    pub fn add(&mut self, status: PaymentStatus, count: u64) {
        match status {
            PaymentStatus::Pending => self.pending += count,
            PaymentStatus::Completed => self.completed += count,
            PaymentStatus::Failed => self.failed += count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyCounts {
    pub live: u64,
    pub draft: u64,
    pub paused: u64,
    pub verified: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub users: u64,
    pub owners: u64,
    pub properties: PropertyCounts,
    pub verifications: RequestStatusCounts,
    pub agreements: PaymentStatusCounts,
}
