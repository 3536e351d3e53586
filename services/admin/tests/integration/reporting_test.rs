use chrono::{Duration, Utc};
use serde_json::json;

use roofline_domain::account::PermissionSet;
use roofline_domain::pagination::PageRequest;

use roofline_admin::domain::types::{
    Action, ActivityEntry, DashboardStats, EntityKind, PropertyCounts, RequestStatusCounts,
};
use roofline_admin::error::AdminError;
use roofline_admin::usecase::activity::ListActivityUseCase;
use roofline_admin::usecase::dashboard::DashboardStatsUseCase;

use crate::helpers::{
    MockActivityLog, MockAdminRepo, MockDashboardRepo, employee, identity, main_admin,
};

// ── Dashboard ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_dashboard_to_any_active_admin() {
    let staff = employee(PermissionSet::default());
    let stats = DashboardStats {
        users: 40,
        owners: 12,
        properties: PropertyCounts {
            live: 20,
            draft: 3,
            paused: 2,
            verified: 7,
        },
        verifications: RequestStatusCounts {
            under_review: 4,
            ..RequestStatusCounts::default()
        },
        ..DashboardStats::default()
    };

    let served = DashboardStatsUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        dashboard: MockDashboardRepo { stats },
    }
    .execute(&identity(&staff))
    .await
    .unwrap();

    assert_eq!(served, stats);
}

#[tokio::test]
async fn should_refuse_dashboard_for_unknown_admin() {
    let ghost = employee(PermissionSet::default());

    let result = DashboardStatsUseCase {
        admins: MockAdminRepo::new(vec![]),
        dashboard: MockDashboardRepo {
            stats: DashboardStats::default(),
        },
    }
    .execute(&identity(&ghost))
    .await;

    assert!(
        matches!(result, Err(AdminError::SessionInvalid)),
        "expected SessionInvalid, got {result:?}"
    );
}

// ── Activity log ─────────────────────────────────────────────────────────────

fn entry(admin_id: uuid::Uuid, minutes_ago: i64) -> ActivityEntry {
    ActivityEntry {
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        ..ActivityEntry::new(
            admin_id,
            Action::DeleteProperty,
            EntityKind::Property,
            None,
            json!({}),
        )
    }
}

#[tokio::test]
async fn should_list_activity_newest_first_for_one_admin() {
    let main = main_admin();
    let staff = employee(PermissionSet::default());
    let older = entry(staff.id, 30);
    let newer = entry(staff.id, 5);
    let unrelated = entry(main.id, 1);

    let listed = ListActivityUseCase {
        admins: MockAdminRepo::new(vec![main.clone(), staff.clone()]),
        log: MockActivityLog::new(vec![older.clone(), unrelated, newer.clone()]),
    }
    .execute(&identity(&main), Some(staff.id), PageRequest::default())
    .await
    .unwrap();

    let ids: Vec<_> = listed.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[tokio::test]
async fn should_forbid_activity_without_permission() {
    let staff = employee(PermissionSet::default());

    let result = ListActivityUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&staff), None, PageRequest::default())
    .await;

    assert!(
        matches!(result, Err(AdminError::PermissionDenied("canViewActivityLogs"))),
        "expected PermissionDenied, got {result:?}"
    );
}
