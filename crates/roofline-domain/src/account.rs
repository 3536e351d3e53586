//! Account and staff roles, and the employee permission bag.

use serde::{Deserialize, Serialize};

/// Marketplace account kind.
///
/// Wire/storage format: `"user"` (property seeker) or `"owner"` (lister).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    User,
    Owner,
}

impl AccountRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Owner => "owner",
        }
    }

    /// Parse the storage value. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }
}

/// Staff role in the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    MainAdmin,
    Employee,
}

impl AdminRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MainAdmin => "main_admin",
            Self::Employee => "employee",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "main_admin" => Some(Self::MainAdmin),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

/// A single gated capability in the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    VerifyProperties,
    ManageUsers,
    ManageProperties,
    ManageAgreements,
    ViewActivityLogs,
}

impl Permission {
    /// Wire name of the flag in the permission bag.
    pub fn flag_name(self) -> &'static str {
        match self {
            Self::VerifyProperties => "canVerifyProperties",
            Self::ManageUsers => "canManageUsers",
            Self::ManageProperties => "canManageProperties",
            Self::ManageAgreements => "canManageAgreements",
            Self::ViewActivityLogs => "canViewActivityLogs",
        }
    }
}

/// Boolean permission flags stored per employee.
///
/// A `MainAdmin` holds every permission regardless of the stored flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionSet {
    pub can_verify_properties: bool,
    pub can_manage_users: bool,
    pub can_manage_properties: bool,
    pub can_manage_agreements: bool,
    pub can_view_activity_logs: bool,
}

impl PermissionSet {
    pub fn all() -> Self {
        Self {
            can_verify_properties: true,
            can_manage_users: true,
            can_manage_properties: true,
            can_manage_agreements: true,
            can_view_activity_logs: true,
        }
    }

    pub fn has(&self, permission: Permission) -> bool {
        match permission {
            Permission::VerifyProperties => self.can_verify_properties,
            Permission::ManageUsers => self.can_manage_users,
            Permission::ManageProperties => self.can_manage_properties,
            Permission::ManageAgreements => self.can_manage_agreements,
            Permission::ViewActivityLogs => self.can_view_activity_logs,
        }
    }

    /// Permissions actually in force for an admin with this role.
    pub fn effective(self, role: AdminRole) -> Self {
        match role {
            AdminRole::MainAdmin => Self::all(),
            AdminRole::Employee => self,
        }
    }
}

/// Whether an admin with `role` and stored `permissions` may use `permission`.
pub fn admin_allows(role: AdminRole, permissions: &PermissionSet, permission: Permission) -> bool {
    permissions.effective(role).has(permission)
}
