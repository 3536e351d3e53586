use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::{AdminRole, PermissionSet};

use crate::domain::types::Admin;
use crate::error::AdminError;
use crate::handlers::json_body;
use crate::state::AppState;
use crate::usecase::auth::{LoginUseCase, MeUseCase};

/// Staff profile. `permissions` are the effective flags, all `true` for a MAIN_ADMIN.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub permissions: PermissionSet,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms_opt")]
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Admin> for AdminResponse {
    fn from(a: Admin) -> Self {
        let permissions = a.effective_permissions();
        Self {
            id: a.id.to_string(),
            name: a.name,
            email: a.email,
            role: a.role,
            is_active: a.is_active,
            permissions,
            last_login_at: a.last_login_at,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: u64,
    pub admin: AdminResponse,
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AdminError> {
    let body = json_body(body)?;
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AdminError::Validation(
            "email and password are required".to_owned(),
        ));
    }
    let usecase = LoginUseCase {
        admins: state.admin_repo(),
        attempts: state.login_attempts(),
        jwt_secret: state.jwt_secret.clone(),
        max_attempts: state.settings.login_max_attempts,
    };
    let (admin, token) = usecase.execute(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        token: token.token,
        expires_at: token.exp,
        admin: admin.into(),
    }))
}

// ── GET /auth/me ─────────────────────────────────────────────────────────────

pub async fn me(
    identity: AdminIdentity,
    State(state): State<AppState>,
) -> Result<Json<AdminResponse>, AdminError> {
    let usecase = MeUseCase {
        admins: state.admin_repo(),
    };
    Ok(Json(usecase.execute(&identity).await?.into()))
}
