use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::{AdminRole, PermissionSet};

use crate::domain::repository::{ActivityLogRepository, AdminRepository};
use crate::domain::types::{Action, ActivityEntry, Admin, EntityKind};
use crate::error::AdminError;
use crate::usecase::access::{load_actor, record, require_main_admin};
use crate::usecase::auth::{NewAdminInput, insert_admin};

async fn load_main_admin<A: AdminRepository>(
    admins: &A,
    identity: &AdminIdentity,
) -> Result<Admin, AdminError> {
    let actor = load_actor(admins, identity).await?;
    require_main_admin(&actor)?;
    Ok(actor)
}

async fn load_employee<A: AdminRepository>(admins: &A, id: Uuid) -> Result<Admin, AdminError> {
    let target = admins
        .find_by_id(id)
        .await?
        .ok_or(AdminError::AdminNotFound)?;
    if target.is_main_admin() {
        return Err(AdminError::InvalidState("main admins cannot be modified here"));
    }
    Ok(target)
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateEmployeeUseCase<A: AdminRepository, L: ActivityLogRepository> {
    pub admins: A,
    pub log: L,
}

impl<A: AdminRepository, L: ActivityLogRepository> CreateEmployeeUseCase<A, L> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        input: NewAdminInput,
        permissions: PermissionSet,
    ) -> Result<Admin, AdminError> {
        let actor = load_main_admin(&self.admins, identity).await?;
        let employee = insert_admin(&self.admins, input, AdminRole::Employee, permissions).await?;
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::CreateEmployee,
                EntityKind::Admin,
                Some(employee.id),
                json!({ "email": employee.email, "permissions": employee.permissions }),
            ),
        )
        .await?;
        tracing::info!(admin_id = %actor.id, employee_id = %employee.id, "employee created");
        Ok(employee)
    }
}

// ── List ─────────────────────────────────────────────────────────────────────

pub struct ListEmployeesUseCase<A: AdminRepository> {
    pub admins: A,
}

impl<A: AdminRepository> ListEmployeesUseCase<A> {
    pub async fn execute(&self, identity: &AdminIdentity) -> Result<Vec<Admin>, AdminError> {
        load_main_admin(&self.admins, identity).await?;
        self.admins.list(Some(AdminRole::Employee)).await
    }
}

// ── Permissions ──────────────────────────────────────────────────────────────

pub struct UpdatePermissionsUseCase<A: AdminRepository, L: ActivityLogRepository> {
    pub admins: A,
    pub log: L,
}

impl<A: AdminRepository, L: ActivityLogRepository> UpdatePermissionsUseCase<A, L> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        employee_id: Uuid,
        permissions: PermissionSet,
    ) -> Result<Admin, AdminError> {
        let actor = load_main_admin(&self.admins, identity).await?;
        let employee = load_employee(&self.admins, employee_id).await?;
        self.admins
            .update_permissions(employee_id, &permissions)
            .await?;
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::UpdatePermissions,
                EntityKind::Admin,
                Some(employee_id),
                json!({ "before": employee.permissions, "after": permissions }),
            ),
        )
        .await?;
        Ok(Admin {
            permissions,
            updated_at: Utc::now(),
            ..employee
        })
    }
}

// ── Status ───────────────────────────────────────────────────────────────────

pub struct SetEmployeeStatusUseCase<A: AdminRepository, L: ActivityLogRepository> {
    pub admins: A,
    pub log: L,
}

impl<A: AdminRepository, L: ActivityLogRepository> SetEmployeeStatusUseCase<A, L> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        employee_id: Uuid,
        active: bool,
    ) -> Result<Admin, AdminError> {
        let actor = load_main_admin(&self.admins, identity).await?;
        let employee = load_employee(&self.admins, employee_id).await?;
        self.admins.set_active(employee_id, active).await?;
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::UpdateEmployeeStatus,
                EntityKind::Admin,
                Some(employee_id),
                json!({ "isActive": active }),
            ),
        )
        .await?;
        tracing::info!(admin_id = %actor.id, %employee_id, active, "employee status changed");
        Ok(Admin {
            is_active: active,
            updated_at: Utc::now(),
            ..employee
        })
    }
}
