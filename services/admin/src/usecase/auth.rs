use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use uuid::Uuid;
use validator::ValidateEmail;

use roofline_auth_types::identity::AdminIdentity;
use roofline_auth_types::password::{hash_password_blocking, verify_password_blocking};
use roofline_auth_types::token::{ADMIN_TOKEN_TTL_SECS, IssuedToken, issue_token};
use roofline_domain::account::{AdminRole, PermissionSet};

use crate::domain::repository::{AdminRepository, LoginAttemptStore};
use crate::domain::types::{Admin, MIN_ADMIN_PASSWORD_LEN};
use crate::error::AdminError;
use crate::usecase::access::load_actor;

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Fields shared by every way of creating an admin.
#[derive(Debug, Clone)]
pub struct NewAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewAdminInput {
    pub fn validate(&self) -> Result<(), AdminError> {
        let mut problems = Vec::new();
        if !self.email.trim().validate_email() {
            problems.push("email: must be a valid email".to_owned());
        }
        if self.name.trim().is_empty() {
            problems.push("name: is required".to_owned());
        }
        if self.password.chars().count() < MIN_ADMIN_PASSWORD_LEN {
            problems.push(format!(
                "password: must be at least {MIN_ADMIN_PASSWORD_LEN} characters"
            ));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AdminError::Validation(problems.join("; ")))
        }
    }
}

/// Validate, hash and insert a new admin.
pub(crate) async fn insert_admin<A: AdminRepository>(
    admins: &A,
    input: NewAdminInput,
    role: AdminRole,
    permissions: PermissionSet,
) -> Result<Admin, AdminError> {
    input.validate()?;
    let email = normalize_email(&input.email);
    if admins.find_by_email(&email).await?.is_some() {
        return Err(AdminError::AdminAlreadyExists);
    }
    let password_hash = hash_password_blocking(input.password).await?;
    let now = Utc::now();
    let admin = Admin {
        id: Uuid::now_v7(),
        name: input.name.trim().to_owned(),
        email,
        password_hash,
        role,
        is_active: true,
        permissions: permissions.effective(role),
        last_login_at: None,
        created_at: now,
        updated_at: now,
    };
    admins.create(&admin).await?;
    Ok(admin)
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<A: AdminRepository, L: LoginAttemptStore> {
    pub admins: A,
    pub attempts: L,
    pub jwt_secret: Arc<str>,
    pub max_attempts: u32,
}

impl<A: AdminRepository, L: LoginAttemptStore> LoginUseCase<A, L> {
    pub async fn execute(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Admin, IssuedToken), AdminError> {
        let email = normalize_email(email);
        if self.attempts.failures(&email).await? >= self.max_attempts {
            tracing::warn!(%email, "admin login locked out");
            return Err(AdminError::TooManyAttempts);
        }

        let Some(admin) = self.admins.find_by_email(&email).await? else {
            self.attempts.record_failure(&email).await?;
            return Err(AdminError::InvalidCredentials);
        };
        let matches =
            verify_password_blocking(password.to_owned(), admin.password_hash.clone()).await?;
        if !matches {
            let failures = self.attempts.record_failure(&email).await?;
            tracing::info!(admin_id = %admin.id, failures, "admin login rejected");
            return Err(AdminError::InvalidCredentials);
        }
        if !admin.is_active {
            return Err(AdminError::AdminDeactivated);
        }

        self.attempts.clear(&email).await?;
        let now = Utc::now();
        self.admins.touch_last_login(admin.id, now).await?;
        let token = issue_token(
            admin.id,
            admin.role.as_str(),
            ADMIN_TOKEN_TTL_SECS,
            &self.jwt_secret,
        )
        .context("sign admin token")?;
        tracing::info!(admin_id = %admin.id, role = admin.role.as_str(), "admin logged in");
        Ok((
            Admin {
                last_login_at: Some(now),
                ..admin
            },
            token,
        ))
    }
}

// ── Me ───────────────────────────────────────────────────────────────────────

pub struct MeUseCase<A: AdminRepository> {
    pub admins: A,
}

impl<A: AdminRepository> MeUseCase<A> {
    pub async fn execute(&self, identity: &AdminIdentity) -> Result<Admin, AdminError> {
        load_actor(&self.admins, identity).await
    }
}

// ── Bootstrap ────────────────────────────────────────────────────────────────

/// Creates a MAIN_ADMIN from the command line. No actor exists yet, so nothing is
/// written to the activity log.
pub struct CreateMainAdminUseCase<A: AdminRepository> {
    pub admins: A,
}

impl<A: AdminRepository> CreateMainAdminUseCase<A> {
    pub async fn execute(&self, input: NewAdminInput) -> Result<Admin, AdminError> {
        let admin = insert_admin(
            &self.admins,
            input,
            AdminRole::MainAdmin,
            PermissionSet::all(),
        )
        .await?;
        tracing::info!(admin_id = %admin.id, email = %admin.email, "main admin created");
        Ok(admin)
    }
}
