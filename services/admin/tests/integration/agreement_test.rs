use roofline_domain::account::PermissionSet;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::PaymentStatus;

use roofline_admin::domain::types::{Admin, AgreementFilter};
use roofline_admin::error::AdminError;
use roofline_admin::usecase::agreement::{ListAgreementsUseCase, UpdateAgreementPaymentUseCase};

use crate::helpers::{
    MockActivityLog, MockAdminRepo, MockAgreementRepo, employee, identity, test_agreement,
};

fn agreements_clerk() -> Admin {
    employee(PermissionSet {
        can_manage_agreements: true,
        ..PermissionSet::default()
    })
}

#[tokio::test]
async fn should_find_agreements_by_any_party_phone() {
    let staff = agreements_clerk();
    let agreement = test_agreement(PaymentStatus::Pending);
    let mut other = test_agreement(PaymentStatus::Pending);
    other.creator_phone = "9000000001".to_owned();
    other.owner_phone = "9000000001".to_owned();
    other.tenant_phone = "9000000002".to_owned();

    let found = ListAgreementsUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        agreements: MockAgreementRepo::new(vec![agreement.clone(), other]),
    }
    .execute(
        &identity(&staff),
        AgreementFilter {
            payment_status: None,
            phone: Some("9123456780".to_owned()),
        },
        PageRequest::default(),
    )
    .await
    .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, agreement.id);
}

#[tokio::test]
async fn should_record_payment_reconciliation() {
    let staff = agreements_clerk();
    let agreement = test_agreement(PaymentStatus::Pending);
    let agreements = MockAgreementRepo::new(vec![agreement.clone()]);
    let stored = agreements.agreements_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    let updated = UpdateAgreementPaymentUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        agreements,
        log,
    }
    .execute(
        &identity(&staff),
        agreement.id,
        PaymentStatus::Completed,
        Some("pay_789".to_owned()),
    )
    .await
    .unwrap();

    assert_eq!(updated.payment_status, PaymentStatus::Completed);
    let stored = stored.lock().unwrap();
    assert_eq!(stored[0].payment_reference.as_deref(), Some("pay_789"));
    let entries = entries.lock().unwrap();
    assert_eq!(entries[0].action, "UPDATE_AGREEMENT_PAYMENT");
    assert_eq!(entries[0].details["from"], "PENDING");
    assert_eq!(entries[0].details["to"], "COMPLETED");
}

#[tokio::test]
async fn should_keep_existing_reference_when_none_given() {
    let staff = agreements_clerk();
    let mut agreement = test_agreement(PaymentStatus::Completed);
    agreement.payment_reference = Some("pay_original".to_owned());

    let updated = UpdateAgreementPaymentUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        agreements: MockAgreementRepo::new(vec![agreement.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&staff), agreement.id, PaymentStatus::Failed, None)
    .await
    .unwrap();

    assert_eq!(updated.payment_status, PaymentStatus::Failed);
    assert_eq!(updated.payment_reference.as_deref(), Some("pay_original"));
}

#[tokio::test]
async fn should_refuse_no_op_payment_update() {
    let staff = agreements_clerk();
    let agreement = test_agreement(PaymentStatus::Pending);
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    let result = UpdateAgreementPaymentUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        agreements: MockAgreementRepo::new(vec![agreement.clone()]),
        log,
    }
    .execute(&identity(&staff), agreement.id, PaymentStatus::Pending, None)
    .await;

    assert!(
        matches!(result, Err(AdminError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
    assert!(entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_agreements_without_permission() {
    let staff = employee(PermissionSet::default());

    let result = ListAgreementsUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        agreements: MockAgreementRepo::new(vec![]),
    }
    .execute(
        &identity(&staff),
        AgreementFilter::default(),
        PageRequest::default(),
    )
    .await;

    assert!(
        matches!(result, Err(AdminError::PermissionDenied("canManageAgreements"))),
        "expected PermissionDenied, got {result:?}"
    );
}
