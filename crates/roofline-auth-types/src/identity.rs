//! Bearer-token identity extractors.
//!
//! Handlers declare the identity they need as an argument:
//!
//! - [`AccountIdentity`]: any marketplace account (user or owner)
//! - [`UserIdentity`] / [`OwnerIdentity`]: a specific account role, 403 otherwise
//! - [`AdminIdentity`]: admin staff. Fine-grained permissions are checked by the
//!   admin service against the stored permission row.
//!
//! The signing secret is read from application state through `FromRef`, so each service
//! only has to expose [`AccountJwtSecret`] or [`AdminJwtSecret`].

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::authorization::{Authorization, Bearer};
use axum_extra::headers::Header;
use http::header::AUTHORIZATION;
use http::request::Parts;
use uuid::Uuid;

use roofline_core::error::AppError;
use roofline_domain::account::{AccountRole, AdminRole};

use crate::token::{AuthError, validate_token};

/// HMAC secret for marketplace account tokens (`JWT_SECRET`).
#[derive(Clone)]
pub struct AccountJwtSecret(pub Arc<str>);

/// HMAC secret for admin tokens (`ADMIN_JWT_SECRET`).
#[derive(Clone)]
pub struct AdminJwtSecret(pub Arc<str>);

fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    let mut values = parts.headers.get_all(AUTHORIZATION).iter();
    Authorization::<Bearer>::decode(&mut values)
        .map(|auth| auth.token().to_owned())
        .map_err(|_| AppError::Unauthorized("missing bearer token"))
}

fn token_rejection(err: AuthError) -> AppError {
    match err {
        AuthError::Expired => AppError::Unauthorized("token expired"),
        AuthError::InvalidSignature | AuthError::Malformed => {
            AppError::Unauthorized("invalid token")
        }
    }
}

/// Any authenticated marketplace account.
#[derive(Debug, Clone)]
pub struct AccountIdentity {
    pub account_id: Uuid,
    pub role: AccountRole,
}

fn authenticate_account(parts: &Parts, secret: &str) -> Result<AccountIdentity, AppError> {
    let token = bearer_token(parts)?;
    let info = validate_token(&token, secret).map_err(token_rejection)?;
    let role = AccountRole::parse(&info.role).ok_or(AppError::Unauthorized("invalid token"))?;
    Ok(AccountIdentity {
        account_id: info.subject,
        role,
    })
}

impl<S> FromRequestParts<S> for AccountIdentity
where
    AccountJwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`. Do the work synchronously
    // and return a 'static future so nothing borrows `parts` across the await.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = AccountJwtSecret::from_ref(state);
        let result = authenticate_account(parts, &secret.0);
        async move { result }
    }
}

/// An authenticated account with the `user` role.
#[derive(Debug, Clone)]
pub struct UserIdentity(pub AccountIdentity);

impl<S> FromRequestParts<S> for UserIdentity
where
    AccountJwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = AccountJwtSecret::from_ref(state);
        let result = authenticate_account(parts, &secret.0).and_then(|identity| {
            match identity.role {
                AccountRole::User => Ok(Self(identity)),
                AccountRole::Owner => Err(AppError::Forbidden("user role required")),
            }
        });
        async move { result }
    }
}

/// An authenticated account with the `owner` role.
#[derive(Debug, Clone)]
pub struct OwnerIdentity(pub AccountIdentity);

impl<S> FromRequestParts<S> for OwnerIdentity
where
    AccountJwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = AccountJwtSecret::from_ref(state);
        let result = authenticate_account(parts, &secret.0).and_then(|identity| {
            match identity.role {
                AccountRole::Owner => Ok(Self(identity)),
                AccountRole::User => Err(AppError::Forbidden("owner role required")),
            }
        });
        async move { result }
    }
}

/// An authenticated admin (MAIN_ADMIN or EMPLOYEE).
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: Uuid,
    pub role: AdminRole,
}

impl<S> FromRequestParts<S> for AdminIdentity
where
    AdminJwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = AdminJwtSecret::from_ref(state);
        let result = bearer_token(parts).and_then(|token| {
            let info = validate_token(&token, &secret.0).map_err(token_rejection)?;
            let role =
                AdminRole::parse(&info.role).ok_or(AppError::Unauthorized("invalid token"))?;
            Ok(Self {
                admin_id: info.subject,
                role,
            })
        });
        async move { result }
    }
}
