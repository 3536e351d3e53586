use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::AccountRole;
use roofline_domain::pagination::PageRequest;

use crate::domain::types::{AccountFilter, AccountRecord};
use crate::error::AdminError;
use crate::handlers::{json_body, non_empty, parse_query};
use crate::state::AppState;
use crate::usecase::account::{
    DeleteAccountUseCase, GetAccountUseCase, ListAccountsUseCase, SetAccountStatusUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub role: AccountRole,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_verified: bool,
    pub is_active: bool,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountRecord> for AccountResponse {
    fn from(a: AccountRecord) -> Self {
        Self {
            id: a.id.to_string(),
            role: a.role,
            name: a.name,
            email: a.email,
            phone: a.phone,
            is_verified: a.is_verified,
            is_active: a.is_active,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// ── GET /accounts ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsQuery {
    pub role: Option<AccountRole>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_accounts(
    identity: AdminIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<AccountResponse>>, AdminError> {
    let query: ListAccountsQuery = parse_query(raw_query)?;
    let usecase = ListAccountsUseCase {
        admins: state.admin_repo(),
        accounts: state.account_repo(),
    };
    let accounts = usecase
        .execute(
            &identity,
            AccountFilter {
                role: query.role,
                search: non_empty(query.search),
                is_active: query.is_active,
            },
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

// ── GET /accounts/{id} ───────────────────────────────────────────────────────

pub async fn get_account(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AdminError> {
    let usecase = GetAccountUseCase {
        admins: state.admin_repo(),
        accounts: state.account_repo(),
    };
    Ok(Json(usecase.execute(&identity, id).await?.into()))
}

// ── PATCH /accounts/{id}/status ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatusRequest {
    pub is_active: bool,
}

pub async fn set_account_status(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<AccountStatusRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, AdminError> {
    let body = json_body(body)?;
    let usecase = SetAccountStatusUseCase {
        admins: state.admin_repo(),
        accounts: state.account_repo(),
        log: state.activity_repo(),
    };
    Ok(Json(usecase.execute(&identity, id, body.is_active).await?.into()))
}

// ── DELETE /accounts/{id} ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct DeleteAccountQuery {
    #[serde(default)]
    pub hard: bool,
}

pub async fn delete_account(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    RawQuery(raw_query): RawQuery,
) -> Result<StatusCode, AdminError> {
    let query: DeleteAccountQuery = parse_query(raw_query)?;
    let usecase = DeleteAccountUseCase {
        admins: state.admin_repo(),
        accounts: state.account_repo(),
        log: state.activity_repo(),
    };
    usecase.execute(&identity, id, query.hard).await?;
    Ok(StatusCode::NO_CONTENT)
}
