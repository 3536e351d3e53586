use chrono::{Duration, Utc};

use roofline_marketplace::domain::types::OUTBOX_WHATSAPP_OTP;
use roofline_marketplace::error::MarketplaceError;
use roofline_marketplace::usecase::mobile_otp::{
    SendMobileOtpUseCase, VerifyMobileOtpUseCase, is_mobile_verified,
};

use crate::helpers::MockMobileRepo;

#[tokio::test]
async fn should_store_otp_and_queue_whatsapp_message() {
    let repo = MockMobileRepo::empty();
    let records = repo.records_handle();
    let events = repo.events_handle();
    let usecase = SendMobileOtpUseCase { repo };

    usecase.execute("9876543210").await.unwrap();

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert!(!records[0].verified);
    assert_eq!(records[0].otp.len(), 4);
    let events = events.lock().unwrap();
    assert_eq!(events[0].kind, OUTBOX_WHATSAPP_OTP);
    assert_eq!(events[0].payload["otp"], records[0].otp.as_str());
}

#[tokio::test]
async fn should_overwrite_previous_code_on_resend() {
    let repo = MockMobileRepo::empty();
    let records = repo.records_handle();
    let usecase = SendMobileOtpUseCase { repo };

    usecase.execute("9876543210").await.unwrap();
    usecase.execute("9876543210").await.unwrap();
    assert_eq!(records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_malformed_number() {
    let usecase = SendMobileOtpUseCase {
        repo: MockMobileRepo::empty(),
    };
    let result = usecase.execute("98765").await;
    assert!(
        matches!(result, Err(MarketplaceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_verify_with_correct_code() {
    let send = SendMobileOtpUseCase {
        repo: MockMobileRepo::empty(),
    };
    send.execute("9876543210").await.unwrap();
    let otp = send.repo.records_handle().lock().unwrap()[0].otp.clone();

    let verify = VerifyMobileOtpUseCase { repo: send.repo };
    verify.execute("9876543210", &otp).await.unwrap();
    assert!(is_mobile_verified(&verify.repo, "9876543210").await.unwrap());
}

#[tokio::test]
async fn should_report_expired_code() {
    let send = SendMobileOtpUseCase {
        repo: MockMobileRepo::empty(),
    };
    send.execute("9876543210").await.unwrap();
    let records = send.repo.records_handle();
    let otp = {
        let mut records = records.lock().unwrap();
        records[0].expires_at = Utc::now() - Duration::seconds(1);
        records[0].otp.clone()
    };

    let verify = VerifyMobileOtpUseCase { repo: send.repo };
    let result = verify.execute("9876543210", &otp).await;
    assert!(
        matches!(result, Err(MarketplaceError::OtpExpired)),
        "expected OtpExpired, got {result:?}"
    );
    assert!(!records.lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_report_unknown_number() {
    let verify = VerifyMobileOtpUseCase {
        repo: MockMobileRepo::empty(),
    };
    let result = verify.execute("9876543210", "1234").await;
    assert!(
        matches!(result, Err(MarketplaceError::MobileNotFound)),
        "expected MobileNotFound, got {result:?}"
    );
}
