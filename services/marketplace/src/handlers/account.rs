use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use roofline_auth_types::identity::AccountIdentity;
use roofline_auth_types::token::IssuedToken;
use roofline_domain::account::AccountRole;

use crate::domain::types::Account;
use crate::error::MarketplaceError;
use crate::handlers::ensure_active;
use crate::state::AppState;
use crate::usecase::account::{
    GetProfileUseCase, IssueAccountOtpUseCase, LoginUseCase, OtpPurpose, ResetPasswordInput,
    ResetPasswordUseCase, SignupInput, SignupUseCase, UpdateProfileInput, UpdateProfileUseCase,
    VerifyAccountOtpUseCase,
};

// The same handlers serve `/user/auth` and `/owner/auth`; the router attaches the
// role as an extension.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub role: AccountRole,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_verified: bool,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id.to_string(),
            role: a.role,
            name: a.name,
            email: a.email,
            phone: a.phone,
            is_verified: a.is_verified,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: u64,
    pub account: AccountResponse,
}

fn session(account: Account, token: IssuedToken) -> SessionResponse {
    SessionResponse {
        token: token.token,
        expires_at: token.exp,
        account: account.into(),
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /{role}/auth/signup ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(equal = 10, message = "must be 10 digits"))]
    pub phone: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

pub async fn signup(
    Extension(role): Extension<AccountRole>,
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), MarketplaceError> {
    body.validate()?;
    let usecase = SignupUseCase {
        repo: state.account_repo(),
        role,
    };
    let account = usecase
        .execute(SignupInput {
            name: body.name,
            email: body.email,
            phone: body.phone,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

// ── POST /{role}/auth/verify-otp ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
}

pub async fn verify_otp(
    Extension(role): Extension<AccountRole>,
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<SessionResponse>, MarketplaceError> {
    let usecase = VerifyAccountOtpUseCase {
        repo: state.account_repo(),
        role,
        jwt_secret: state.jwt_secret.clone(),
    };
    let (account, token) = usecase.execute(&body.phone, &body.otp).await?;
    Ok(Json(session(account, token)))
}

// ── POST /{role}/auth/resend-otp, /forgot-password ───────────────────────────

#[derive(Deserialize)]
pub struct PhoneRequest {
    pub phone: String,
}

pub async fn resend_otp(
    Extension(role): Extension<AccountRole>,
    State(state): State<AppState>,
    Json(body): Json<PhoneRequest>,
) -> Result<Json<MessageResponse>, MarketplaceError> {
    let usecase = IssueAccountOtpUseCase {
        repo: state.account_repo(),
        role,
    };
    usecase.execute(&body.phone, OtpPurpose::Activation).await?;
    Ok(Json(MessageResponse { message: "OTP sent" }))
}

pub async fn forgot_password(
    Extension(role): Extension<AccountRole>,
    State(state): State<AppState>,
    Json(body): Json<PhoneRequest>,
) -> Result<Json<MessageResponse>, MarketplaceError> {
    let usecase = IssueAccountOtpUseCase {
        repo: state.account_repo(),
        role,
    };
    usecase
        .execute(&body.phone, OtpPurpose::PasswordReset)
        .await?;
    Ok(Json(MessageResponse {
        message: "password reset OTP sent",
    }))
}

// ── POST /{role}/auth/login ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

pub async fn login(
    Extension(role): Extension<AccountRole>,
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, MarketplaceError> {
    let usecase = LoginUseCase {
        repo: state.account_repo(),
        role,
        jwt_secret: state.jwt_secret.clone(),
    };
    let (account, token) = usecase.execute(&body.phone, &body.password).await?;
    Ok(Json(session(account, token)))
}

// ── POST /{role}/auth/reset-password ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub phone: String,
    pub otp: String,
    pub new_password: String,
}

pub async fn reset_password(
    Extension(role): Extension<AccountRole>,
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, MarketplaceError> {
    let usecase = ResetPasswordUseCase {
        repo: state.account_repo(),
        role,
    };
    usecase
        .execute(ResetPasswordInput {
            phone: body.phone,
            otp: body.otp,
            new_password: body.new_password,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "password updated",
    }))
}

// ── GET /{role}/auth/profile ─────────────────────────────────────────────────

fn require_role(identity: &AccountIdentity, role: AccountRole) -> Result<(), MarketplaceError> {
    if identity.role != role {
        return Err(MarketplaceError::Forbidden);
    }
    Ok(())
}

pub async fn get_profile(
    Extension(role): Extension<AccountRole>,
    identity: AccountIdentity,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, MarketplaceError> {
    require_role(&identity, role)?;
    ensure_active(&state, &identity).await?;
    let usecase = GetProfileUseCase {
        repo: state.account_repo(),
    };
    let account = usecase.execute(identity.account_id).await?;
    Ok(Json(account.into()))
}

// ── PUT /{role}/auth/profile ─────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
}

pub async fn update_profile(
    Extension(role): Extension<AccountRole>,
    identity: AccountIdentity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>, MarketplaceError> {
    require_role(&identity, role)?;
    body.validate()?;
    ensure_active(&state, &identity).await?;
    let usecase = UpdateProfileUseCase {
        repo: state.account_repo(),
    };
    let account = usecase
        .execute(
            identity.account_id,
            UpdateProfileInput {
                name: body.name,
                email: body.email,
            },
        )
        .await?;
    Ok(Json(account.into()))
}
