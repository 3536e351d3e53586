#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use roofline_domain::account::{AdminRole, PermissionSet};
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::{PaymentStatus, RequestStatus};

use crate::domain::types::{
    AccountFilter, AccountRecord, ActivityEntry, Admin, AgreementFilter, AgreementRecord,
    Approval, DashboardStats, PropertyFilter, PropertyRecord, Rejection, RequestStatusCounts,
    VerificationRequest, VerificationScope,
};
use crate::error::AdminError;

/// Repository for staff members and their permission rows.
pub trait AdminRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, AdminError>;

    /// Lookup by lower-cased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AdminError>;

    /// Insert the admin and its permission row in one transaction.
    /// A taken email surfaces as `AdminAlreadyExists`.
    async fn create(&self, admin: &Admin) -> Result<(), AdminError>;

    /// All admins, optionally of one role, newest first.
    async fn list(&self, role: Option<AdminRole>) -> Result<Vec<Admin>, AdminError>;

    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &PermissionSet,
    ) -> Result<(), AdminError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), AdminError>;

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AdminError>;
}

/// Failed-login counter keyed by email.
pub trait LoginAttemptStore: Send + Sync {
    /// Failures recorded inside the current window.
    async fn failures(&self, email: &str) -> Result<u32, AdminError>;

    /// Count one failure, opening a window on the first. Returns the new count.
    async fn record_failure(&self, email: &str) -> Result<u32, AdminError>;

    async fn clear(&self, email: &str) -> Result<(), AdminError>;
}

/// Admin side of the verification workflow.
pub trait VerificationAdminRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationRequest>, AdminError>;

    /// Requests inside `scope`, newest first.
    async fn list(
        &self,
        scope: VerificationScope,
        status: Option<RequestStatus>,
        page: PageRequest,
    ) -> Result<Vec<VerificationRequest>, AdminError>;

    async fn count_by_status(
        &self,
        scope: VerificationScope,
    ) -> Result<RequestStatusCounts, AdminError>;

    /// Set the assignee while the request is still in flight.
    /// Returns `false` when the request has reached a terminal status meanwhile.
    async fn assign(&self, id: Uuid, admin_id: Uuid) -> Result<bool, AdminError>;

    /// Approve in one transaction: request, property, and the active approval row.
    /// Returns `false` when the request is no longer under review.
    async fn approve(&self, approval: &Approval) -> Result<bool, AdminError>;

    /// Reject in one transaction: request and property status.
    /// Returns `false` when the request is no longer under review.
    async fn reject(&self, rejection: &Rejection) -> Result<bool, AdminError>;
}

/// Moderation of marketplace accounts.
pub trait AccountAdminRepository: Send + Sync {
    async fn list(
        &self,
        filter: &AccountFilter,
        page: PageRequest,
    ) -> Result<Vec<AccountRecord>, AdminError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, AdminError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), AdminError>;

    /// Remove the account and everything hanging off it.
    async fn hard_delete(&self, id: Uuid) -> Result<(), AdminError>;
}

/// Moderation of listings.
pub trait PropertyAdminRepository: Send + Sync {
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<Vec<PropertyRecord>, AdminError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PropertyRecord>, AdminError>;

    /// Leaves `updated_at` untouched so the owner's edit cooldown is unaffected.
    async fn set_available(&self, id: Uuid, available: bool) -> Result<(), AdminError>;

    async fn soft_delete(&self, id: Uuid) -> Result<(), AdminError>;
}

pub trait AgreementAdminRepository: Send + Sync {
    async fn list(
        &self,
        filter: &AgreementFilter,
        page: PageRequest,
    ) -> Result<Vec<AgreementRecord>, AdminError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgreementRecord>, AdminError>;

    async fn set_payment(
        &self,
        id: Uuid,
        status: PaymentStatus,
        reference: Option<&str>,
    ) -> Result<(), AdminError>;
}

pub trait DashboardRepository: Send + Sync {
    async fn stats(&self) -> Result<DashboardStats, AdminError>;
}

/// Append-only audit trail.
pub trait ActivityLogRepository: Send + Sync {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), AdminError>;

    /// Newest first, optionally for one admin.
    async fn list(
        &self,
        admin_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<ActivityEntry>, AdminError>;
}

/// Bulk flip of lapsed verifications.
pub trait ExpirySweeper: Send + Sync {
    /// Expire every verified property whose window ended before `now`.
    /// Returns the number of properties flipped.
    async fn expire_lapsed(&self, now: DateTime<Utc>) -> Result<u64, AdminError>;
}
