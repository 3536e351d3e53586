use chrono::{Duration, Utc};
use uuid::Uuid;

use roofline_domain::verification::PropertyVerificationStatus;

use roofline_admin::usecase::expiry::ExpirySweepUseCase;

use crate::helpers::{MockExpirySweeper, test_property};

#[tokio::test]
async fn should_expire_only_lapsed_verifications() {
    let mut lapsed = test_property(Uuid::new_v4());
    lapsed.is_verified = true;
    lapsed.verification_status = PropertyVerificationStatus::Verified;
    lapsed.verification_expiry = Some(Utc::now() - Duration::hours(1));

    let mut current = test_property(Uuid::new_v4());
    current.is_verified = true;
    current.verification_status = PropertyVerificationStatus::Verified;
    current.verification_expiry = Some(Utc::now() + Duration::days(30));

    let sweeper = MockExpirySweeper::new(vec![lapsed, current]);
    let stored = sweeper.properties_handle();

    let expired = ExpirySweepUseCase { sweeper }.execute().await.unwrap();

    assert_eq!(expired, 1);
    let stored = stored.lock().unwrap();
    assert_eq!(stored[0].verification_status, PropertyVerificationStatus::Expired);
    assert!(!stored[0].is_verified);
    assert_eq!(stored[1].verification_status, PropertyVerificationStatus::Verified);
    assert!(stored[1].is_verified);
}

#[tokio::test]
async fn should_report_nothing_to_expire() {
    let sweeper = MockExpirySweeper::new(vec![test_property(Uuid::new_v4())]);

    let expired = ExpirySweepUseCase { sweeper }.execute().await.unwrap();

    assert_eq!(expired, 0);
}
