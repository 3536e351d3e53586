use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::Permission;

use crate::domain::repository::{ActivityLogRepository, AdminRepository};
use crate::domain::types::{ActivityEntry, Admin};
use crate::error::AdminError;

/// Load the admin behind a token. The stored row is authoritative: a deleted or
/// deactivated admin is refused even while their token is still unexpired.
pub async fn load_actor<A: AdminRepository>(
    admins: &A,
    identity: &AdminIdentity,
) -> Result<Admin, AdminError> {
    let admin = admins
        .find_by_id(identity.admin_id)
        .await?
        .ok_or(AdminError::SessionInvalid)?;
    if !admin.is_active {
        return Err(AdminError::AdminDeactivated);
    }
    Ok(admin)
}

pub fn require(admin: &Admin, permission: Permission) -> Result<(), AdminError> {
    if admin.allows(permission) {
        Ok(())
    } else {
        Err(AdminError::PermissionDenied(permission.flag_name()))
    }
}

pub fn require_main_admin(admin: &Admin) -> Result<(), AdminError> {
    if admin.is_main_admin() {
        Ok(())
    } else {
        Err(AdminError::MainAdminRequired)
    }
}

/// [`load_actor`] followed by a permission check.
pub async fn authorize<A: AdminRepository>(
    admins: &A,
    identity: &AdminIdentity,
    permission: Permission,
) -> Result<Admin, AdminError> {
    let admin = load_actor(admins, identity).await?;
    require(&admin, permission)?;
    Ok(admin)
}

/// Append an activity row after the mutation it describes has committed.
///
/// The mutation is not rolled back if the append fails; the failure is logged and
/// surfaced as an internal error.
pub async fn record<L: ActivityLogRepository>(
    log: &L,
    entry: ActivityEntry,
) -> Result<(), AdminError> {
    if let Err(e) = log.append(&entry).await {
        tracing::error!(
            action = %entry.action,
            entity_id = ?entry.entity_id,
            "failed to append activity log"
        );
        return Err(e);
    }
    Ok(())
}
