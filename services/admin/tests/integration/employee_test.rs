use uuid::Uuid;

use roofline_domain::account::{AdminRole, PermissionSet};

use roofline_admin::domain::types::Admin;
use roofline_admin::error::AdminError;
use roofline_admin::usecase::auth::NewAdminInput;
use roofline_admin::usecase::employee::{
    CreateEmployeeUseCase, ListEmployeesUseCase, SetEmployeeStatusUseCase,
    UpdatePermissionsUseCase,
};

use crate::helpers::{MockActivityLog, MockAdminRepo, employee, identity, main_admin, verifier};

fn new_staff() -> NewAdminInput {
    NewAdminInput {
        name: "Verifier One".to_owned(),
        email: "Verifier@Roofline.test".to_owned(),
        password: "long-enough-pw".to_owned(),
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_employee_and_log_it() {
    let main = main_admin();
    let admins = MockAdminRepo::new(vec![main.clone()]);
    let stored = admins.admins_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    let created = CreateEmployeeUseCase { admins, log }
        .execute(&identity(&main), new_staff(), verifier())
        .await
        .unwrap();

    assert_eq!(created.role, AdminRole::Employee);
    assert_eq!(created.email, "verifier@roofline.test");
    assert!(created.permissions.can_verify_properties);
    assert!(!created.permissions.can_manage_users);
    assert_eq!(stored.lock().unwrap().len(), 2);

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "CREATE_EMPLOYEE");
    assert_eq!(entries[0].admin_id, main.id);
    assert_eq!(entries[0].entity_id, Some(created.id));
}

#[tokio::test]
async fn should_forbid_employee_from_creating_staff() {
    let staff = employee(PermissionSet::all());
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    let result = CreateEmployeeUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        log,
    }
    .execute(&identity(&staff), new_staff(), verifier())
    .await;

    assert!(
        matches!(result, Err(AdminError::MainAdminRequired)),
        "expected MainAdminRequired, got {result:?}"
    );
    assert!(entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_deactivated_main_admin() {
    let main = Admin {
        is_active: false,
        ..main_admin()
    };

    let result = CreateEmployeeUseCase {
        admins: MockAdminRepo::new(vec![main.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&main), new_staff(), verifier())
    .await;

    assert!(
        matches!(result, Err(AdminError::AdminDeactivated)),
        "expected AdminDeactivated, got {result:?}"
    );
}

// ── List ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_employees() {
    let main = main_admin();
    let staff = employee(verifier());

    let listed = ListEmployeesUseCase {
        admins: MockAdminRepo::new(vec![main.clone(), staff.clone()]),
    }
    .execute(&identity(&main))
    .await
    .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, staff.id);
}

// ── Permissions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_replace_employee_permissions() {
    let main = main_admin();
    let staff = employee(verifier());
    let admins = MockAdminRepo::new(vec![main.clone(), staff.clone()]);
    let stored = admins.admins_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();
    let granted = PermissionSet {
        can_manage_users: true,
        can_view_activity_logs: true,
        ..PermissionSet::default()
    };

    let updated = UpdatePermissionsUseCase { admins, log }
        .execute(&identity(&main), staff.id, granted)
        .await
        .unwrap();

    assert_eq!(updated.permissions, granted);
    let stored = stored.lock().unwrap();
    let row = stored.iter().find(|a| a.id == staff.id).unwrap();
    assert!(!row.permissions.can_verify_properties);
    assert!(row.permissions.can_manage_users);
    assert_eq!(entries.lock().unwrap()[0].action, "UPDATE_PERMISSIONS");
}

#[tokio::test]
async fn should_refuse_to_edit_main_admin_permissions() {
    let main = main_admin();
    let other_main = main_admin();

    let result = UpdatePermissionsUseCase {
        admins: MockAdminRepo::new(vec![main.clone(), other_main.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&main), other_main.id, PermissionSet::default())
    .await;

    assert!(
        matches!(result, Err(AdminError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_missing_employee() {
    let main = main_admin();

    let result = UpdatePermissionsUseCase {
        admins: MockAdminRepo::new(vec![main.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&main), Uuid::new_v4(), verifier())
    .await;

    assert!(
        matches!(result, Err(AdminError::AdminNotFound)),
        "expected AdminNotFound, got {result:?}"
    );
}

// ── Status ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_deactivate_employee() {
    let main = main_admin();
    let staff = employee(verifier());
    let admins = MockAdminRepo::new(vec![main.clone(), staff.clone()]);
    let stored = admins.admins_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    let updated = SetEmployeeStatusUseCase { admins, log }
        .execute(&identity(&main), staff.id, false)
        .await
        .unwrap();

    assert!(!updated.is_active);
    assert!(
        !stored
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == staff.id)
            .unwrap()
            .is_active
    );
    let entries = entries.lock().unwrap();
    assert_eq!(entries[0].action, "UPDATE_EMPLOYEE_STATUS");
    assert_eq!(entries[0].details["isActive"], false);
}
