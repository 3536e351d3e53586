use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use roofline_core::error::error_body;

/// Marketplace service error variants.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("{0}")]
    Validation(String),
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("OTP expired")]
    OtpExpired,
    #[error("invalid OTP")]
    InvalidOtp,
    #[error("contact number not verified")]
    ContactNotVerified,
    #[error("Property can be updated only after {days_left} days")]
    EditCooldown { days_left: i64 },
    #[error("payment already completed")]
    PaymentAlreadyCompleted,
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account not verified")]
    AccountNotVerified,
    #[error("account deactivated")]
    AccountDeactivated,
    #[error("session is no longer valid")]
    SessionInvalid,
    #[error("forbidden")]
    Forbidden,
    #[error("account not found")]
    AccountNotFound,
    #[error("mobile number not found")]
    MobileNotFound,
    #[error("property not found")]
    PropertyNotFound,
    #[error("verification request not found")]
    RequestNotFound,
    #[error("contact not found")]
    ContactNotFound,
    #[error("rent agreement not found")]
    AgreementNotFound,
    #[error("account already exists")]
    AccountAlreadyExists,
    #[error("a verification request is already in progress")]
    VerificationInFlight,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MarketplaceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::MissingFields(_) => "MISSING_FIELDS",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::ContactNotVerified => "CONTACT_NOT_VERIFIED",
            Self::EditCooldown { .. } => "EDIT_COOLDOWN",
            Self::PaymentAlreadyCompleted => "PAYMENT_ALREADY_COMPLETED",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountNotVerified => "ACCOUNT_NOT_VERIFIED",
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            Self::SessionInvalid => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::MobileNotFound => "MOBILE_NOT_FOUND",
            Self::PropertyNotFound => "PROPERTY_NOT_FOUND",
            Self::RequestNotFound => "REQUEST_NOT_FOUND",
            Self::ContactNotFound => "CONTACT_NOT_FOUND",
            Self::AgreementNotFound => "AGREEMENT_NOT_FOUND",
            Self::AccountAlreadyExists => "ACCOUNT_ALREADY_EXISTS",
            Self::VerificationInFlight => "VERIFICATION_IN_FLIGHT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::MissingFields(_)
            | Self::OtpExpired
            | Self::InvalidOtp
            | Self::ContactNotVerified
            | Self::EditCooldown { .. }
            | Self::PaymentAlreadyCompleted
            | Self::InvalidState(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::SessionInvalid => StatusCode::UNAUTHORIZED,
            Self::AccountNotVerified | Self::AccountDeactivated | Self::Forbidden => {
                StatusCode::FORBIDDEN
            }
            Self::AccountNotFound
            | Self::MobileNotFound
            | Self::PropertyNotFound
            | Self::RequestNotFound
            | Self::ContactNotFound
            | Self::AgreementNotFound => StatusCode::NOT_FOUND,
            Self::AccountAlreadyExists | Self::VerificationInFlight => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for MarketplaceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_owned());
                (field.to_string(), reason)
            })
            .collect();
        fields.sort();
        let message = fields
            .into_iter()
            .map(|(field, reason)| format!("{field}: {reason}"))
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(message)
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        // The cooldown rejection carries the remaining days for the edit form.
        if let Self::EditCooldown { days_left } = self {
            let body = serde_json::json!({
                "kind": self.kind(),
                "message": self.to_string(),
                "daysLeft": days_left,
            });
            return (self.status(), axum::Json(body)).into_response();
        }
        error_body(self.status(), self.kind(), self.to_string())
    }
}
