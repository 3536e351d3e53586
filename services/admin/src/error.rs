use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use roofline_core::error::error_body;

/// Admin service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("admin session is no longer valid")]
    SessionInvalid,
    #[error("admin account deactivated")]
    AdminDeactivated,
    #[error("main admin role required")]
    MainAdminRequired,
    #[error("missing permission: {0}")]
    PermissionDenied(&'static str),
    #[error("request is assigned to another admin")]
    NotAssignee,
    #[error("admin not found")]
    AdminNotFound,
    #[error("account not found")]
    AccountNotFound,
    #[error("property not found")]
    PropertyNotFound,
    #[error("verification request not found")]
    RequestNotFound,
    #[error("rent agreement not found")]
    AgreementNotFound,
    #[error("an admin with this email already exists")]
    AdminAlreadyExists,
    #[error("too many login attempts, try again later")]
    TooManyAttempts,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::SessionInvalid => "UNAUTHORIZED",
            Self::AdminDeactivated => "ADMIN_DEACTIVATED",
            Self::MainAdminRequired => "MAIN_ADMIN_REQUIRED",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::NotAssignee => "NOT_ASSIGNEE",
            Self::AdminNotFound => "ADMIN_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::PropertyNotFound => "PROPERTY_NOT_FOUND",
            Self::RequestNotFound => "REQUEST_NOT_FOUND",
            Self::AgreementNotFound => "AGREEMENT_NOT_FOUND",
            Self::AdminAlreadyExists => "ADMIN_ALREADY_EXISTS",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidState(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::SessionInvalid => StatusCode::UNAUTHORIZED,
            Self::AdminDeactivated
            | Self::MainAdminRequired
            | Self::PermissionDenied(_)
            | Self::NotAssignee => StatusCode::FORBIDDEN,
            Self::AdminNotFound
            | Self::AccountNotFound
            | Self::PropertyNotFound
            | Self::RequestNotFound
            | Self::AgreementNotFound => StatusCode::NOT_FOUND,
            Self::AdminAlreadyExists => StatusCode::CONFLICT,
            Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AdminError {
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

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_body(self.status(), self.kind(), self.to_string())
    }
}
