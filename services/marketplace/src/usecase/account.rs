use std::sync::Arc;

use anyhow::Context as _;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use roofline_auth_types::password::{hash_password_blocking, verify_password_blocking};
use roofline_auth_types::token::{ACCOUNT_TOKEN_TTL_SECS, IssuedToken, issue_token};
use roofline_domain::account::AccountRole;

use crate::domain::repository::AccountRepository;
use crate::domain::types::{
    ACCOUNT_OTP_TTL_SECS, Account, MIN_PASSWORD_LEN, OUTBOX_ACCOUNT_OTP, OUTBOX_PASSWORD_RESET,
};
use crate::error::MarketplaceError;
use crate::usecase::otp::{check_otp, generate_otp, otp_event};

fn validate_password(password: &str) -> Result<(), MarketplaceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(MarketplaceError::Validation(format!(
            "password: must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn sign(account: &Account, secret: &str) -> Result<IssuedToken, MarketplaceError> {
    let token = issue_token(
        account.id,
        account.role.as_str(),
        ACCOUNT_TOKEN_TTL_SECS,
        secret,
    )
    .context("sign account token")?;
    Ok(token)
}

async fn find_by_phone<R: AccountRepository>(
    repo: &R,
    role: AccountRole,
    phone: &str,
) -> Result<Account, MarketplaceError> {
    repo.find_by_phone(role, phone)
        .await?
        .ok_or(MarketplaceError::AccountNotFound)
}

/// Load the account behind a token. The stored row decides: a removed account
/// invalidates the session and a deactivated one is refused.
pub async fn load_active_account<R: AccountRepository>(
    repo: &R,
    account_id: Uuid,
) -> Result<Account, MarketplaceError> {
    let account = repo
        .find_by_id(account_id)
        .await?
        .ok_or(MarketplaceError::SessionInvalid)?;
    if !account.is_active {
        return Err(MarketplaceError::AccountDeactivated);
    }
    Ok(account)
}

async fn find_active_by_phone<R: AccountRepository>(
    repo: &R,
    role: AccountRole,
    phone: &str,
) -> Result<Account, MarketplaceError> {
    let account = find_by_phone(repo, role, phone).await?;
    if !account.is_active {
        return Err(MarketplaceError::AccountDeactivated);
    }
    Ok(account)
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

pub struct SignupUseCase<R: AccountRepository> {
    pub repo: R,
    pub role: AccountRole,
}

impl<R: AccountRepository> SignupUseCase<R> {
    pub async fn execute(&self, input: SignupInput) -> Result<Account, MarketplaceError> {
        validate_password(&input.password)?;
        if self
            .repo
            .exists(self.role, &input.phone, &input.email)
            .await?
        {
            return Err(MarketplaceError::AccountAlreadyExists);
        }

        let password_hash = hash_password_blocking(input.password).await?;
        let otp = generate_otp();
        let now = Utc::now();
        let account = Account {
            id: Uuid::now_v7(),
            role: self.role,
            name: input.name,
            email: input.email,
            phone: input.phone,
            password_hash,
            otp: Some(otp.clone()),
            otp_expires_at: Some(now + Duration::seconds(ACCOUNT_OTP_TTL_SECS)),
            is_verified: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let event = otp_event(
            OUTBOX_ACCOUNT_OTP,
            json!({ "email": account.email, "phone": account.phone }),
            &otp,
        );
        self.repo.create_with_outbox(&account, &event).await?;
        tracing::info!(account_id = %account.id, role = self.role.as_str(), "account created");
        Ok(account)
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyAccountOtpUseCase<R: AccountRepository> {
    pub repo: R,
    pub role: AccountRole,
    pub jwt_secret: Arc<str>,
}

impl<R: AccountRepository> VerifyAccountOtpUseCase<R> {
    pub async fn execute(
        &self,
        phone: &str,
        otp: &str,
    ) -> Result<(Account, IssuedToken), MarketplaceError> {
        let mut account = find_active_by_phone(&self.repo, self.role, phone).await?;
        check_otp(
            account.otp.as_deref(),
            account.otp_expires_at,
            otp,
            Utc::now(),
        )?;
        self.repo.mark_verified(account.id).await?;
        account.is_verified = true;
        account.otp = None;
        account.otp_expires_at = None;
        let token = sign(&account, &self.jwt_secret)?;
        Ok((account, token))
    }
}

// ── ResendOtp / ForgotPassword ───────────────────────────────────────────────

/// Why a fresh account OTP is being issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    Activation,
    PasswordReset,
}

pub struct IssueAccountOtpUseCase<R: AccountRepository> {
    pub repo: R,
    pub role: AccountRole,
}

impl<R: AccountRepository> IssueAccountOtpUseCase<R> {
    pub async fn execute(&self, phone: &str, purpose: OtpPurpose) -> Result<(), MarketplaceError> {
        let account = find_active_by_phone(&self.repo, self.role, phone).await?;
        if purpose == OtpPurpose::Activation && account.is_verified {
            return Err(MarketplaceError::InvalidState("account already verified"));
        }
        let kind = match purpose {
            OtpPurpose::Activation => OUTBOX_ACCOUNT_OTP,
            OtpPurpose::PasswordReset => OUTBOX_PASSWORD_RESET,
        };
        let otp = generate_otp();
        let expires_at = Utc::now() + Duration::seconds(ACCOUNT_OTP_TTL_SECS);
        let event = otp_event(
            kind,
            json!({ "email": account.email, "phone": account.phone }),
            &otp,
        );
        self.repo
            .store_otp_with_outbox(account.id, &otp, expires_at, &event)
            .await
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: AccountRepository> {
    pub repo: R,
    pub role: AccountRole,
    pub jwt_secret: Arc<str>,
}

impl<R: AccountRepository> LoginUseCase<R> {
    pub async fn execute(
        &self,
        phone: &str,
        password: &str,
    ) -> Result<(Account, IssuedToken), MarketplaceError> {
        let account = self
            .repo
            .find_by_phone(self.role, phone)
            .await?
            .ok_or(MarketplaceError::InvalidCredentials)?;
        let matches =
            verify_password_blocking(password.to_owned(), account.password_hash.clone()).await?;
        if !matches {
            return Err(MarketplaceError::InvalidCredentials);
        }
        if !account.is_active {
            return Err(MarketplaceError::AccountDeactivated);
        }
        if !account.is_verified {
            return Err(MarketplaceError::AccountNotVerified);
        }
        let token = sign(&account, &self.jwt_secret)?;
        Ok((account, token))
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub phone: String,
    pub otp: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<R: AccountRepository> {
    pub repo: R,
    pub role: AccountRole,
}

impl<R: AccountRepository> ResetPasswordUseCase<R> {
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), MarketplaceError> {
        validate_password(&input.new_password)?;
        let account = find_active_by_phone(&self.repo, self.role, &input.phone).await?;
        check_otp(
            account.otp.as_deref(),
            account.otp_expires_at,
            &input.otp,
            Utc::now(),
        )?;
        let password_hash = hash_password_blocking(input.new_password).await?;
        self.repo.reset_password(account.id, &password_hash).await
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, account_id: Uuid) -> Result<Account, MarketplaceError> {
        self.repo
            .find_by_id(account_id)
            .await?
            .ok_or(MarketplaceError::AccountNotFound)
    }
}

pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct UpdateProfileUseCase<R: AccountRepository> {
    pub repo: R,
}

impl<R: AccountRepository> UpdateProfileUseCase<R> {
    pub async fn execute(
        &self,
        account_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<Account, MarketplaceError> {
        if input.name.is_none() && input.email.is_none() {
            return Err(MarketplaceError::Validation(
                "name or email is required".to_owned(),
            ));
        }
        self.repo
            .update_profile(account_id, input.name.as_deref(), input.email.as_deref())
            .await?;
        self.repo
            .find_by_id(account_id)
            .await?
            .ok_or(MarketplaceError::AccountNotFound)
    }
}
