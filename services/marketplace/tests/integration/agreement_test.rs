use uuid::Uuid;

use roofline_domain::account::AccountRole;
use roofline_domain::verification::PaymentStatus;

use roofline_marketplace::domain::agreement_template::AGREEMENT_TITLE;
use roofline_marketplace::error::MarketplaceError;
use roofline_marketplace::usecase::agreement::{
    AgreementForm, CreateAgreementUseCase, DownloadAgreementUseCase, GetAgreementUseCase,
    ListAgreementsUseCase, MarkDocumentGeneratedUseCase, UpdateAgreementPaymentUseCase,
};

use crate::helpers::{FakeRenderer, MockAccountRepo, MockAgreementRepo, test_account};

const OWNER_PHONE: &str = "9000000001";
const TENANT_PHONE: &str = "9000000002";

fn form() -> AgreementForm {
    AgreementForm {
        owner_name: "Asha Rao".into(),
        owner_phone: OWNER_PHONE.into(),
        owner_address: "14 Lake Road, Bengaluru".into(),
        tenant_name: "Vikram Shah".into(),
        tenant_phone: TENANT_PHONE.into(),
        tenant_address: "7 Hill Street, Pune".into(),
        property_address: "Flat 3B, Palm Residency".into(),
        rent_amount: "25000".into(),
        security_deposit: "100000".into(),
        maintenance: Some(String::new()),
        agreement_duration: "11".into(),
        rent_start_date: "2025-01-01".into(),
        lock_in_period: "90".into(),
        notice_period: "30".into(),
        rent_due_day: "5".into(),
    }
}

#[tokio::test]
async fn should_create_pending_agreement_for_creator() {
    let creator = test_account(AccountRole::Owner, OWNER_PHONE);
    let agreements = MockAgreementRepo::empty();
    let stored = agreements.agreements_handle();
    let usecase = CreateAgreementUseCase {
        agreements,
        accounts: MockAccountRepo::new(vec![creator.clone()]),
    };

    let agreement = usecase.execute(creator.id, form()).await.unwrap();
    assert_eq!(agreement.payment_status, PaymentStatus::Pending);
    assert_eq!(agreement.creator_phone, OWNER_PHONE);
    assert!(agreement.maintenance.is_none(), "blank maintenance is dropped");
    assert!(!agreement.document_generated);
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_invalid_form_before_storing() {
    let creator = test_account(AccountRole::User, TENANT_PHONE);
    let agreements = MockAgreementRepo::empty();
    let stored = agreements.agreements_handle();
    let usecase = CreateAgreementUseCase {
        agreements,
        accounts: MockAccountRepo::new(vec![creator.clone()]),
    };

    let mut bad = form();
    bad.rent_due_day = "32".into();
    let result = usecase.execute(creator.id, bad).await;
    assert!(
        matches!(result, Err(MarketplaceError::Validation(ref m)) if m.contains("rentDueDay")),
        "expected Validation naming rentDueDay, got {result:?}"
    );
    assert!(stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_share_agreement_with_tenant_by_phone() {
    let creator = test_account(AccountRole::Owner, OWNER_PHONE);
    let tenant = test_account(AccountRole::User, TENANT_PHONE);
    let stranger = test_account(AccountRole::User, "9000000009");
    let accounts = vec![creator.clone(), tenant.clone(), stranger.clone()];

    let create = CreateAgreementUseCase {
        agreements: MockAgreementRepo::empty(),
        accounts: MockAccountRepo::new(accounts.clone()),
    };
    let agreement = create.execute(creator.id, form()).await.unwrap();

    let list = ListAgreementsUseCase {
        agreements: create.agreements,
        accounts: MockAccountRepo::new(accounts.clone()),
    };
    assert_eq!(list.execute(tenant.id).await.unwrap().len(), 1);
    assert!(list.execute(stranger.id).await.unwrap().is_empty());

    let get = GetAgreementUseCase {
        agreements: list.agreements,
        accounts: MockAccountRepo::new(accounts),
    };
    assert_eq!(get.execute(tenant.id, agreement.id).await.unwrap().id, agreement.id);
    let denied = get.execute(stranger.id, agreement.id).await;
    assert!(
        matches!(denied, Err(MarketplaceError::Forbidden)),
        "expected Forbidden, got {denied:?}"
    );
}

#[tokio::test]
async fn should_render_pdf_for_party() {
    let creator = test_account(AccountRole::Owner, OWNER_PHONE);
    let create = CreateAgreementUseCase {
        agreements: MockAgreementRepo::empty(),
        accounts: MockAccountRepo::new(vec![creator.clone()]),
    };
    let agreement = create.execute(creator.id, form()).await.unwrap();

    let renderer = FakeRenderer::default();
    let rendered_titles = renderer.rendered_handle();
    let download = DownloadAgreementUseCase {
        agreements: create.agreements,
        accounts: create.accounts,
        renderer,
    };
    let rendered = download.execute(creator.id, agreement.id).await.unwrap();

    assert_eq!(
        rendered.file_name,
        format!("rent-agreement-{}.pdf", agreement.id)
    );
    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert_eq!(*rendered_titles.lock().unwrap(), vec![AGREEMENT_TITLE.to_owned()]);
}

#[tokio::test]
async fn should_report_missing_agreement() {
    let caller = test_account(AccountRole::User, TENANT_PHONE);
    let usecase = GetAgreementUseCase {
        agreements: MockAgreementRepo::empty(),
        accounts: MockAccountRepo::new(vec![caller.clone()]),
    };
    let result = usecase.execute(caller.id, Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(MarketplaceError::AgreementNotFound)),
        "expected AgreementNotFound, got {result:?}"
    );
}

// ── Payment / document flags ─────────────────────────────────────────────────

#[tokio::test]
async fn should_retry_failed_payment_then_lock_completed() {
    let creator = test_account(AccountRole::Owner, OWNER_PHONE);
    let create = CreateAgreementUseCase {
        agreements: MockAgreementRepo::empty(),
        accounts: MockAccountRepo::new(vec![creator.clone()]),
    };
    let agreement = create.execute(creator.id, form()).await.unwrap();

    let pay = UpdateAgreementPaymentUseCase {
        agreements: create.agreements,
        accounts: create.accounts,
    };
    let failed = pay
        .execute(creator.id, agreement.id, PaymentStatus::Failed, None)
        .await
        .unwrap();
    assert_eq!(failed.payment_status, PaymentStatus::Failed);

    let paid = pay
        .execute(
            creator.id,
            agreement.id,
            PaymentStatus::Completed,
            Some("pay_789".to_owned()),
        )
        .await
        .unwrap();
    assert_eq!(paid.payment_reference.as_deref(), Some("pay_789"));

    let again = pay
        .execute(creator.id, agreement.id, PaymentStatus::Failed, None)
        .await;
    assert!(
        matches!(again, Err(MarketplaceError::PaymentAlreadyCompleted)),
        "expected PaymentAlreadyCompleted, got {again:?}"
    );
}

#[tokio::test]
async fn should_reject_payment_back_to_pending() {
    let creator = test_account(AccountRole::Owner, OWNER_PHONE);
    let create = CreateAgreementUseCase {
        agreements: MockAgreementRepo::empty(),
        accounts: MockAccountRepo::new(vec![creator.clone()]),
    };
    let agreement = create.execute(creator.id, form()).await.unwrap();

    let pay = UpdateAgreementPaymentUseCase {
        agreements: create.agreements,
        accounts: create.accounts,
    };
    let result = pay
        .execute(creator.id, agreement.id, PaymentStatus::Pending, None)
        .await;
    assert!(
        matches!(result, Err(MarketplaceError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_flag_document_generated() {
    let creator = test_account(AccountRole::Owner, OWNER_PHONE);
    let create = CreateAgreementUseCase {
        agreements: MockAgreementRepo::empty(),
        accounts: MockAccountRepo::new(vec![creator.clone()]),
    };
    let agreement = create.execute(creator.id, form()).await.unwrap();
    let stored = create.agreements.agreements_handle();

    MarkDocumentGeneratedUseCase {
        agreements: create.agreements,
        accounts: create.accounts,
    }
    .execute(creator.id, agreement.id)
    .await
    .unwrap();
    assert!(stored.lock().unwrap()[0].document_generated);
}
