use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::PermissionSet;

use crate::error::AdminError;
use crate::handlers::auth::AdminResponse;
use crate::handlers::json_body;
use crate::state::AppState;
use crate::usecase::auth::NewAdminInput;
use crate::usecase::employee::{
    CreateEmployeeUseCase, ListEmployeesUseCase, SetEmployeeStatusUseCase,
    UpdatePermissionsUseCase,
};

// ── POST /employees ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub permissions: PermissionSet,
}

pub async fn create_employee(
    identity: AdminIdentity,
    State(state): State<AppState>,
    body: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdminResponse>), AdminError> {
    let body = json_body(body)?;
    let usecase = CreateEmployeeUseCase {
        admins: state.admin_repo(),
        log: state.activity_repo(),
    };
    let employee = usecase
        .execute(
            &identity,
            NewAdminInput {
                name: body.name,
                email: body.email,
                password: body.password,
            },
            body.permissions,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(employee.into())))
}

// ── GET /employees ───────────────────────────────────────────────────────────

pub async fn list_employees(
    identity: AdminIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminResponse>>, AdminError> {
    let usecase = ListEmployeesUseCase {
        admins: state.admin_repo(),
    };
    let employees = usecase.execute(&identity).await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

// ── PATCH /employees/{id}/permissions ────────────────────────────────────────

pub async fn update_permissions(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<PermissionSet>, JsonRejection>,
) -> Result<Json<AdminResponse>, AdminError> {
    let permissions = json_body(body)?;
    let usecase = UpdatePermissionsUseCase {
        admins: state.admin_repo(),
        log: state.activity_repo(),
    };
    Ok(Json(usecase.execute(&identity, id, permissions).await?.into()))
}

// ── PATCH /employees/{id}/status ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub is_active: bool,
}

pub async fn set_employee_status(
    identity: AdminIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<AdminResponse>, AdminError> {
    let body = json_body(body)?;
    let usecase = SetEmployeeStatusUseCase {
        admins: state.admin_repo(),
        log: state.activity_repo(),
    };
    Ok(Json(usecase.execute(&identity, id, body.is_active).await?.into()))
}
