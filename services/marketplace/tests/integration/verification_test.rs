use chrono::{Duration, Utc};
use uuid::Uuid;

use roofline_domain::geo::GeoPoint;
use roofline_domain::verification::{
    PaymentStatus, PropertyVerificationStatus, RequestStatus, photo_object_key,
};
use roofline_testing::storage::FakeStorage;

use roofline_marketplace::error::MarketplaceError;
use roofline_marketplace::usecase::verification::{
    CaptureLocationInput, CaptureLocationUseCase, CompletePaymentUseCase,
    InitiateVerificationUseCase, ListVerificationRequestsUseCase, PhotoUploadUrlsUseCase,
    VerificationStatusUseCase,
};

use crate::helpers::{
    FakeGeocoder, MockPropertyRepo, MockVerificationRepo, test_property, test_request,
};

fn capture_input(request_id: Uuid, photos: usize) -> CaptureLocationInput {
    CaptureLocationInput {
        request_id,
        location: GeoPoint::new(12.9719, 77.6412),
        photo_keys: (1..=photos).map(|i| photo_object_key(request_id, i)).collect(),
    }
}

// ── InitiateVerificationUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_open_request_pending_payment_with_fee() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let requests = MockVerificationRepo::empty();
    let stored = requests.requests_handle();
    let usecase = InitiateVerificationUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        requests,
        fee: 499,
    };

    let request = usecase.execute(owner, property.id).await.unwrap();
    assert_eq!(request.status, RequestStatus::PendingPayment);
    assert_eq!(request.payment_status, PaymentStatus::Pending);
    assert_eq!(request.amount, 499);
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_second_request_while_one_is_in_flight() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let usecase = InitiateVerificationUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        requests: MockVerificationRepo::new(vec![test_request(
            property.id,
            owner,
            RequestStatus::UnderReview,
        )]),
        fee: 499,
    };

    let result = usecase.execute(owner, property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::VerificationInFlight)),
        "expected VerificationInFlight, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_new_request_after_rejection() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let usecase = InitiateVerificationUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        requests: MockVerificationRepo::new(vec![test_request(
            property.id,
            owner,
            RequestStatus::Rejected,
        )]),
        fee: 499,
    };

    assert!(usecase.execute(owner, property.id).await.is_ok());
}

#[tokio::test]
async fn should_forbid_initiating_for_someone_elses_property() {
    let property = test_property(Uuid::new_v4());
    let usecase = InitiateVerificationUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        requests: MockVerificationRepo::empty(),
        fee: 499,
    };

    let result = usecase.execute(Uuid::new_v4(), property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

// ── CompletePaymentUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_complete_payment_once() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PendingPayment);
    let usecase = CompletePaymentUseCase {
        requests: MockVerificationRepo::new(vec![request.clone()]),
    };

    let paid = usecase
        .execute(owner, request.id, Some("pay_123".to_owned()))
        .await
        .unwrap();
    assert_eq!(paid.status, RequestStatus::PaymentCompleted);
    assert_eq!(paid.payment_status, PaymentStatus::Completed);
    assert_eq!(paid.payment_reference.as_deref(), Some("pay_123"));

    let again = usecase.execute(owner, request.id, None).await;
    assert!(
        matches!(again, Err(MarketplaceError::PaymentAlreadyCompleted)),
        "expected PaymentAlreadyCompleted, got {again:?}"
    );
}

#[tokio::test]
async fn should_report_unknown_request() {
    let usecase = CompletePaymentUseCase {
        requests: MockVerificationRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4(), Uuid::new_v4(), None).await;
    assert!(
        matches!(result, Err(MarketplaceError::RequestNotFound)),
        "expected RequestNotFound, got {result:?}"
    );
}

// ── CaptureLocationUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_refuse_capture_before_payment() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PendingPayment);
    let usecase = CaptureLocationUseCase {
        requests: MockVerificationRepo::new(vec![request.clone()]),
        geocoder: FakeGeocoder::returning("Indiranagar, Bengaluru"),
    };

    let result = usecase.execute(owner, capture_input(request.id, 2)).await;
    assert!(
        matches!(result, Err(MarketplaceError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_move_paid_request_under_review_with_address() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PaymentCompleted);
    let requests = MockVerificationRepo::new(vec![request.clone()]);
    let stored = requests.requests_handle();
    let usecase = CaptureLocationUseCase {
        requests,
        geocoder: FakeGeocoder::returning("Indiranagar, Bengaluru"),
    };

    let capture = usecase
        .execute(owner, capture_input(request.id, 3))
        .await
        .unwrap();
    assert_eq!(
        capture.captured_address.as_deref(),
        Some("Indiranagar, Bengaluru")
    );
    assert_eq!(capture.property_id, request.property_id);

    let stored = stored.lock().unwrap();
    assert_eq!(stored[0].status, RequestStatus::UnderReview);
    assert_eq!(stored[0].photo_keys.len(), 3);
}

#[tokio::test]
async fn should_capture_without_address_when_geocoding_fails() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PaymentCompleted);
    let requests = MockVerificationRepo::new(vec![request.clone()]);
    let captures = requests.captures_handle();
    let usecase = CaptureLocationUseCase {
        requests,
        geocoder: FakeGeocoder::failing(),
    };

    let capture = usecase
        .execute(owner, capture_input(request.id, 1))
        .await
        .unwrap();
    assert!(capture.captured_address.is_none());
    assert_eq!(captures.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_photo_keys_outside_request_prefix() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PaymentCompleted);
    let usecase = CaptureLocationUseCase {
        requests: MockVerificationRepo::new(vec![request.clone()]),
        geocoder: FakeGeocoder::returning("x"),
    };

    let mut input = capture_input(request.id, 1);
    input.photo_keys = vec![photo_object_key(Uuid::new_v4(), 1)];
    let result = usecase.execute(owner, input).await;
    assert!(
        matches!(result, Err(MarketplaceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_between_one_and_five_photos() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PaymentCompleted);
    let usecase = CaptureLocationUseCase {
        requests: MockVerificationRepo::new(vec![request.clone()]),
        geocoder: FakeGeocoder::returning("x"),
    };

    let none = usecase.execute(owner, capture_input(request.id, 0)).await;
    assert!(matches!(none, Err(MarketplaceError::Validation(_))));
    let too_many = usecase.execute(owner, capture_input(request.id, 6)).await;
    assert!(matches!(too_many, Err(MarketplaceError::Validation(_))));
}

#[tokio::test]
async fn should_reject_out_of_range_coordinates() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PaymentCompleted);
    let usecase = CaptureLocationUseCase {
        requests: MockVerificationRepo::new(vec![request.clone()]),
        geocoder: FakeGeocoder::returning("x"),
    };

    let mut input = capture_input(request.id, 1);
    input.location = GeoPoint::new(95.0, 77.0);
    let result = usecase.execute(owner, input).await;
    assert!(
        matches!(result, Err(MarketplaceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

// ── PhotoUploadUrlsUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_numbered_photo_upload_urls() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PaymentCompleted);
    let usecase = PhotoUploadUrlsUseCase {
        requests: MockVerificationRepo::new(vec![request.clone()]),
        storage: FakeStorage::new(),
    };

    let urls = usecase.execute(owner, request.id, 2).await.unwrap();
    let keys: Vec<&str> = urls.iter().map(|u| u.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            format!("verification/{}/1.jpeg", request.id),
            format!("verification/{}/2.jpeg", request.id),
        ]
    );
}

#[tokio::test]
async fn should_cap_photo_upload_urls_at_five() {
    let owner = Uuid::new_v4();
    let request = test_request(Uuid::new_v4(), owner, RequestStatus::PaymentCompleted);
    let usecase = PhotoUploadUrlsUseCase {
        requests: MockVerificationRepo::new(vec![request.clone()]),
        storage: FakeStorage::new(),
    };

    let result = usecase.execute(owner, request.id, 6).await;
    assert!(
        matches!(result, Err(MarketplaceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

// ── Status / Requests ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_expired_status_after_window_passes() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_verified = true;
    property.verification_status = PropertyVerificationStatus::Verified;
    property.verification_expiry = Some(Utc::now() - Duration::days(1));
    let mut approved = test_request(property.id, owner, RequestStatus::Approved);
    approved.valid_until = property.verification_expiry;

    let usecase = VerificationStatusUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        requests: MockVerificationRepo::new(vec![approved.clone()]),
    };

    let view = usecase.execute(owner, property.id).await.unwrap();
    assert_eq!(view.status, PropertyVerificationStatus::Expired);
    assert!(!view.is_verified);
    assert_eq!(
        view.latest_request.map(|r| r.id),
        Some(approved.id)
    );
}

#[tokio::test]
async fn should_list_only_own_requests() {
    let owner = Uuid::new_v4();
    let mine = test_request(Uuid::new_v4(), owner, RequestStatus::PendingPayment);
    let theirs = test_request(Uuid::new_v4(), Uuid::new_v4(), RequestStatus::PendingPayment);
    let usecase = ListVerificationRequestsUseCase {
        requests: MockVerificationRepo::new(vec![mine.clone(), theirs]),
    };

    let listed = usecase.execute(owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);
}
