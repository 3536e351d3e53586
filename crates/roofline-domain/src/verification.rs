//! Verification workflow states.
//!
//! A verification request moves forward only:
//!
//! ```text
//! PENDING_PAYMENT -> PAYMENT_COMPLETED -> UNDER_REVIEW -> APPROVED -> EXPIRED
//!                                                     \-> REJECTED
//! ```
//!
//! The property itself carries a separate [`PropertyVerificationStatus`] derived from the
//! latest request and a time check against its expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    PendingPayment,
    PaymentCompleted,
    UnderReview,
    Approved,
    Rejected,
    Expired,
}

impl RequestStatus {
    /// Statuses counted by the one-in-flight-per-property rule.
    pub const IN_FLIGHT: [RequestStatus; 3] = [
        RequestStatus::PendingPayment,
        RequestStatus::PaymentCompleted,
        RequestStatus::UnderReview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingPayment => "PENDING_PAYMENT",
            Self::PaymentCompleted => "PAYMENT_COMPLETED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING_PAYMENT" => Some(Self::PendingPayment),
            "PAYMENT_COMPLETED" => Some(Self::PaymentCompleted),
            "UNDER_REVIEW" => Some(Self::UnderReview),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !Self::IN_FLIGHT.contains(&self)
    }

    /// Forward-only transition table.
    pub fn can_advance_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::PendingPayment, Self::PaymentCompleted)
                | (Self::PaymentCompleted, Self::UnderReview)
                | (Self::UnderReview, Self::Approved)
                | (Self::UnderReview, Self::Rejected)
                | (Self::Approved, Self::Expired)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Allowed payment-status changes. A failed payment may be retried.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed)
                | (Self::Pending, Self::Failed)
                | (Self::Failed, Self::Completed)
        )
    }
}

/// Verification status carried by the property row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyVerificationStatus {
    NotVerified,
    PendingVerification,
    Verified,
    Expired,
}

impl PropertyVerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotVerified => "NOT_VERIFIED",
            Self::PendingVerification => "PENDING_VERIFICATION",
            Self::Verified => "VERIFIED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOT_VERIFIED" => Some(Self::NotVerified),
            "PENDING_VERIFICATION" => Some(Self::PendingVerification),
            "VERIFIED" => Some(Self::Verified),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Outcome chosen by a reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn as_request_status(self) -> RequestStatus {
        match self {
            Self::Approved => RequestStatus::Approved,
            Self::Rejected => RequestStatus::Rejected,
        }
    }
}

/// Default verification fee charged on initiation.
pub const DEFAULT_VERIFICATION_FEE: i32 = 499;

/// Default number of days an approval stays valid.
pub const DEFAULT_VALIDITY_DAYS: i64 = 90;

/// Maximum number of photos captured with a location.
pub const MAX_VERIFICATION_PHOTOS: usize = 5;

/// `true` once a verified property's expiry has passed.
pub fn is_verification_expired(
    is_verified: bool,
    valid_until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    is_verified && valid_until.is_some_and(|until| now > until)
}

/// Object key for the `index`-th (1-based) photo of a verification request.
pub fn photo_object_key(request_id: impl std::fmt::Display, index: usize) -> String {
    format!("verification/{request_id}/{index}.jpeg")
}

/// Prefix every photo key of a request must start with.
pub fn photo_key_prefix(request_id: impl std::fmt::Display) -> String {
    format!("verification/{request_id}/")
}
