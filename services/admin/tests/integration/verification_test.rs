use chrono::{Duration, Utc};
use uuid::Uuid;

use roofline_domain::account::PermissionSet;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::{
    PropertyVerificationStatus, RequestStatus, ReviewDecision,
};
use roofline_testing::storage::FakeStorage;

use roofline_admin::domain::types::Admin;
use roofline_admin::error::AdminError;
use roofline_admin::usecase::verification::{
    AssignVerificationUseCase, ListVerificationsUseCase, ReviewInput, ReviewVerificationUseCase,
    VerificationStatsUseCase,
};

use crate::helpers::{
    MockActivityLog, MockAdminRepo, MockVerificationRepo, employee, identity, main_admin,
    test_request, verifier,
};

fn review(
    admins: Vec<Admin>,
    requests: MockVerificationRepo,
    log: MockActivityLog,
) -> ReviewVerificationUseCase<MockAdminRepo, MockVerificationRepo, MockActivityLog> {
    ReviewVerificationUseCase {
        admins: MockAdminRepo::new(admins),
        requests,
        log,
        validity_days: 365,
    }
}

fn approve() -> ReviewInput {
    ReviewInput {
        decision: ReviewDecision::Approved,
        notes: Some("photos match the address".to_owned()),
    }
}

// ── List / Stats ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_scope_employee_queue_to_unassigned_and_own() {
    let staff = employee(verifier());
    let someone_else = Uuid::new_v4();
    let unassigned = test_request(RequestStatus::UnderReview, None);
    let mine = test_request(RequestStatus::UnderReview, Some(staff.id));
    let theirs = test_request(RequestStatus::UnderReview, Some(someone_else));

    let views = ListVerificationsUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        requests: MockVerificationRepo::new(vec![unassigned.clone(), mine.clone(), theirs]),
        storage: FakeStorage::new(),
    }
    .execute(&identity(&staff), None, PageRequest::default())
    .await
    .unwrap();

    let ids: Vec<Uuid> = views.iter().map(|v| v.request.id).collect();
    assert_eq!(ids, vec![unassigned.id, mine.id]);
}

#[tokio::test]
async fn should_show_main_admin_whole_queue_filtered_by_status() {
    let main = main_admin();
    let requests = vec![
        test_request(RequestStatus::UnderReview, Some(Uuid::new_v4())),
        test_request(RequestStatus::UnderReview, None),
        test_request(RequestStatus::Approved, None),
    ];

    let views = ListVerificationsUseCase {
        admins: MockAdminRepo::new(vec![main.clone()]),
        requests: MockVerificationRepo::new(requests),
        storage: FakeStorage::new(),
    }
    .execute(
        &identity(&main),
        Some(RequestStatus::UnderReview),
        PageRequest::default(),
    )
    .await
    .unwrap();

    assert_eq!(views.len(), 2);
}

#[tokio::test]
async fn should_presign_photo_urls_in_key_order() {
    let main = main_admin();
    let mut request = test_request(RequestStatus::UnderReview, None);
    request.photo_keys = vec!["verification/a.jpg".to_owned(), "verification/b.jpg".to_owned()];

    let views = ListVerificationsUseCase {
        admins: MockAdminRepo::new(vec![main.clone()]),
        requests: MockVerificationRepo::new(vec![request]),
        storage: FakeStorage::new(),
    }
    .execute(&identity(&main), None, PageRequest::default())
    .await
    .unwrap();

    assert_eq!(
        views[0].photo_urls,
        vec![
            Some("https://storage.test/verification/a.jpg?op=get".to_owned()),
            Some("https://storage.test/verification/b.jpg?op=get".to_owned()),
        ]
    );
}

#[tokio::test]
async fn should_keep_listing_when_presign_fails() {
    let main = main_admin();
    let mut request = test_request(RequestStatus::UnderReview, None);
    request.photo_keys = vec!["verification/a.jpg".to_owned()];

    let views = ListVerificationsUseCase {
        admins: MockAdminRepo::new(vec![main.clone()]),
        requests: MockVerificationRepo::new(vec![request]),
        storage: FakeStorage::failing_gets(),
    }
    .execute(&identity(&main), None, PageRequest::default())
    .await
    .unwrap();

    assert_eq!(views[0].photo_urls, vec![None]);
}

#[tokio::test]
async fn should_forbid_queue_without_verify_permission() {
    let staff = employee(PermissionSet::default());

    let result = ListVerificationsUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        requests: MockVerificationRepo::new(vec![]),
        storage: FakeStorage::new(),
    }
    .execute(&identity(&staff), None, PageRequest::default())
    .await;

    assert!(
        matches!(result, Err(AdminError::PermissionDenied("canVerifyProperties"))),
        "expected PermissionDenied, got {result:?}"
    );
}

#[tokio::test]
async fn should_count_only_visible_requests() {
    let staff = employee(verifier());
    let requests = vec![
        test_request(RequestStatus::UnderReview, None),
        test_request(RequestStatus::UnderReview, Some(staff.id)),
        test_request(RequestStatus::Approved, Some(staff.id)),
        test_request(RequestStatus::UnderReview, Some(Uuid::new_v4())),
    ];

    let counts = VerificationStatsUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        requests: MockVerificationRepo::new(requests),
    }
    .execute(&identity(&staff))
    .await
    .unwrap();

    assert_eq!(counts.under_review, 2);
    assert_eq!(counts.approved, 1);
    assert_eq!(counts.total(), 3);
}

// ── Assign ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_assign_request_to_verifier() {
    let main = main_admin();
    let staff = employee(verifier());
    let request = test_request(RequestStatus::UnderReview, None);
    let requests = MockVerificationRepo::new(vec![request.clone()]);
    let stored = requests.requests_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    let assigned = AssignVerificationUseCase {
        admins: MockAdminRepo::new(vec![main.clone(), staff.clone()]),
        requests,
        log,
    }
    .execute(&identity(&main), request.id, staff.id)
    .await
    .unwrap();

    assert_eq!(assigned.assigned_to, Some(staff.id));
    assert_eq!(stored.lock().unwrap()[0].assigned_to, Some(staff.id));
    assert_eq!(entries.lock().unwrap()[0].action, "ASSIGN_VERIFICATION");
}

#[tokio::test]
async fn should_refuse_assignee_without_verify_permission() {
    let main = main_admin();
    let staff = employee(PermissionSet::default());
    let request = test_request(RequestStatus::UnderReview, None);

    let result = AssignVerificationUseCase {
        admins: MockAdminRepo::new(vec![main.clone(), staff.clone()]),
        requests: MockVerificationRepo::new(vec![request.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&main), request.id, staff.id)
    .await;

    assert!(
        matches!(result, Err(AdminError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_assigning_closed_request() {
    let main = main_admin();
    let staff = employee(verifier());
    let request = test_request(RequestStatus::Approved, None);

    let result = AssignVerificationUseCase {
        admins: MockAdminRepo::new(vec![main.clone(), staff.clone()]),
        requests: MockVerificationRepo::new(vec![request.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&main), request.id, staff.id)
    .await;

    assert!(
        matches!(result, Err(AdminError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_reserve_assignment_for_main_admin() {
    let staff = employee(verifier());
    let request = test_request(RequestStatus::UnderReview, None);

    let result = AssignVerificationUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        requests: MockVerificationRepo::new(vec![request.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&staff), request.id, staff.id)
    .await;

    assert!(
        matches!(result, Err(AdminError::MainAdminRequired)),
        "expected MainAdminRequired, got {result:?}"
    );
}

// ── Review ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_approve_with_validity_window() {
    let staff = employee(verifier());
    let request = test_request(RequestStatus::UnderReview, Some(staff.id));
    let requests = MockVerificationRepo::new(vec![request.clone()]);
    let approvals = requests.approvals_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();
    let before = Utc::now();

    let reviewed = review(vec![staff.clone()], requests, log)
        .execute(&identity(&staff), request.id, approve())
        .await
        .unwrap();

    assert_eq!(reviewed.request.status, RequestStatus::Approved);
    assert_eq!(reviewed.property_status, PropertyVerificationStatus::Verified);
    assert_eq!(reviewed.request.reviewed_by, Some(staff.id));

    let approvals = approvals.lock().unwrap();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0].property_id, request.property_id);
    assert!(approvals[0].valid_from >= before);
    assert_eq!(
        approvals[0].valid_until - approvals[0].valid_from,
        Duration::days(365)
    );
    assert_eq!(entries.lock().unwrap()[0].action, "REVIEW_VERIFICATION");
}

#[tokio::test]
async fn should_reject_and_clear_property_verification() {
    let main = main_admin();
    let request = test_request(RequestStatus::UnderReview, Some(Uuid::new_v4()));
    let requests = MockVerificationRepo::new(vec![request.clone()]);
    let rejections = requests.rejections_handle();

    let reviewed = review(vec![main.clone()], requests, MockActivityLog::default())
        .execute(
            &identity(&main),
            request.id,
            ReviewInput {
                decision: ReviewDecision::Rejected,
                notes: Some("   ".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(reviewed.request.status, RequestStatus::Rejected);
    assert_eq!(reviewed.property_status, PropertyVerificationStatus::NotVerified);
    assert_eq!(reviewed.request.review_notes, None);
    assert_eq!(rejections.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_forbid_review_of_request_assigned_elsewhere() {
    let staff = employee(verifier());
    let request = test_request(RequestStatus::UnderReview, Some(Uuid::new_v4()));
    let requests = MockVerificationRepo::new(vec![request.clone()]);
    let approvals = requests.approvals_handle();

    let result = review(vec![staff.clone()], requests, MockActivityLog::default())
        .execute(&identity(&staff), request.id, approve())
        .await;

    assert!(
        matches!(result, Err(AdminError::NotAssignee)),
        "expected NotAssignee, got {result:?}"
    );
    assert!(approvals.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_review_before_payment_completes() {
    let main = main_admin();
    let request = test_request(RequestStatus::PendingPayment, None);

    let result = review(
        vec![main.clone()],
        MockVerificationRepo::new(vec![request.clone()]),
        MockActivityLog::default(),
    )
    .execute(&identity(&main), request.id, approve())
    .await;

    assert!(
        matches!(result, Err(AdminError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_second_review() {
    let main = main_admin();
    let request = test_request(RequestStatus::UnderReview, None);
    let usecase = review(
        vec![main.clone()],
        MockVerificationRepo::new(vec![request.clone()]),
        MockActivityLog::default(),
    );

    usecase
        .execute(&identity(&main), request.id, approve())
        .await
        .unwrap();
    let result = usecase
        .execute(&identity(&main), request.id, approve())
        .await;

    assert!(
        matches!(result, Err(AdminError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_missing_request() {
    let main = main_admin();

    let result = review(
        vec![main.clone()],
        MockVerificationRepo::new(vec![]),
        MockActivityLog::default(),
    )
    .execute(&identity(&main), Uuid::new_v4(), approve())
    .await;

    assert!(
        matches!(result, Err(AdminError::RequestNotFound)),
        "expected RequestNotFound, got {result:?}"
    );
}
