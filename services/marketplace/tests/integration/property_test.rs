use chrono::{Duration, Utc};
use uuid::Uuid;

use roofline_domain::listing::ListingState;
use roofline_domain::verification::PropertyVerificationStatus;
use roofline_testing::storage::FakeStorage;

use roofline_marketplace::domain::types::{ListingTerms, PropertyUpdate};
use roofline_marketplace::error::MarketplaceError;
use roofline_marketplace::usecase::property::{
    CreatePropertyUseCase, DeletePropertyUseCase, GetOwnPropertyUseCase, IMAGE_URLS_WARNING,
    ListMyPropertiesUseCase, NewProperty, PublishPropertyUseCase, ToggleAvailabilityUseCase,
    UpdateImagesUseCase, UpdatePropertyUseCase,
};

use crate::helpers::{MockMobileRepo, MockPropertyRepo, test_property};

fn new_rent_property(publish: bool, with_images: bool) -> NewProperty {
    NewProperty {
        property_type: "APARTMENT".to_owned(),
        title: "1BHK in Koramangala".to_owned(),
        description: None,
        bhk: Some("1".to_owned()),
        furnishing: None,
        city: "Bengaluru".to_owned(),
        locality: "Koramangala".to_owned(),
        address: "5th Block".to_owned(),
        location: None,
        contact_number: "9876543210".to_owned(),
        terms: ListingTerms::Rent {
            rent: "18,000".to_owned(),
            security_deposit: "50,000".to_owned(),
            maintenance: None,
        },
        publish,
        with_images,
    }
}

// ── CreatePropertyUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_save_draft_without_verified_contact() {
    let properties = MockPropertyRepo::empty();
    let stored = properties.properties_handle();
    let usecase = CreatePropertyUseCase {
        properties,
        mobiles: MockMobileRepo::empty(),
        storage: FakeStorage::new(),
    };

    let created = usecase
        .execute(Uuid::new_v4(), new_rent_property(false, false))
        .await
        .unwrap();

    assert_eq!(created.property.state(), ListingState::Draft);
    assert!(created.upload_urls.is_empty());
    assert_eq!(stored.lock().unwrap().len(), 1);
    assert_eq!(
        created.property.verification_status,
        PropertyVerificationStatus::NotVerified
    );
}

#[tokio::test]
async fn should_require_verified_contact_to_publish_on_create() {
    let properties = MockPropertyRepo::empty();
    let stored = properties.properties_handle();
    let usecase = CreatePropertyUseCase {
        properties,
        mobiles: MockMobileRepo::empty(),
        storage: FakeStorage::new(),
    };

    let result = usecase
        .execute(Uuid::new_v4(), new_rent_property(true, false))
        .await;

    assert!(
        matches!(result, Err(MarketplaceError::ContactNotVerified)),
        "expected ContactNotVerified, got {result:?}"
    );
    assert!(stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_publish_on_create_with_verified_contact() {
    let usecase = CreatePropertyUseCase {
        properties: MockPropertyRepo::empty(),
        mobiles: MockMobileRepo::verified("9876543210"),
        storage: FakeStorage::new(),
    };

    let created = usecase
        .execute(Uuid::new_v4(), new_rent_property(true, true))
        .await
        .unwrap();

    assert_eq!(created.property.state(), ListingState::Available);
    assert_eq!(created.upload_urls.len(), 5);
    let first = &created.upload_urls[0];
    assert_eq!(
        first.key,
        format!("images/{}/first.jpeg", created.property.id)
    );
    assert!(first.url.ends_with("?op=put"));
    assert!(created.warning.is_none());
}

#[tokio::test]
async fn should_keep_property_and_warn_when_upload_urls_fail() {
    let properties = MockPropertyRepo::empty();
    let stored = properties.properties_handle();
    let usecase = CreatePropertyUseCase {
        properties,
        mobiles: MockMobileRepo::empty(),
        storage: FakeStorage::failing_puts(),
    };

    let created = usecase
        .execute(Uuid::new_v4(), new_rent_property(false, true))
        .await
        .unwrap();

    assert_eq!(created.warning, Some(IMAGE_URLS_WARNING));
    assert!(created.upload_urls.is_empty());
    assert_eq!(stored.lock().unwrap().len(), 1);
}

// ── Owner reads ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_deleted_listings_from_owner() {
    let owner = Uuid::new_v4();
    let live = test_property(owner);
    let mut deleted = test_property(owner);
    deleted.is_draft = true;
    deleted.is_available = false;
    let other = test_property(Uuid::new_v4());

    let usecase = ListMyPropertiesUseCase {
        properties: MockPropertyRepo::new(vec![live.clone(), deleted.clone(), other]),
        storage: FakeStorage::new(),
    };
    let views = usecase.execute(owner).await.unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].property.id, live.id);
    assert!(views[0].images.first.is_some());
}

#[tokio::test]
async fn should_forbid_reading_another_owners_property() {
    let property = test_property(Uuid::new_v4());
    let usecase = GetOwnPropertyUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        storage: FakeStorage::new(),
    };

    let result = usecase.execute(Uuid::new_v4(), property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_expire_lapsed_verification_on_read() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_verified = true;
    property.verification_status = PropertyVerificationStatus::Verified;
    property.verification_expiry = Some(Utc::now() - Duration::hours(1));

    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let expired = properties.expired_handle();
    let usecase = GetOwnPropertyUseCase {
        properties,
        storage: FakeStorage::failing_gets(),
    };

    let view = usecase.execute(owner, property.id).await.unwrap();
    assert!(!view.property.is_verified);
    assert_eq!(
        view.property.verification_status,
        PropertyVerificationStatus::Expired
    );
    assert_eq!(*expired.lock().unwrap(), vec![property.id]);
    assert!(view.images.first.is_none(), "failed presigns become null");
}

// ── ToggleAvailabilityUseCase ────────────────────────────────────────────────

#[tokio::test]
async fn should_pause_and_resume_live_listing() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let usecase = ToggleAvailabilityUseCase { properties };

    assert!(!usecase.execute(owner, property.id).await.unwrap());
    assert_eq!(stored.lock().unwrap()[0].state(), ListingState::Paused);
    assert!(usecase.execute(owner, property.id).await.unwrap());
    assert_eq!(stored.lock().unwrap()[0].state(), ListingState::Available);
}

#[tokio::test]
async fn should_refuse_to_toggle_a_draft() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_draft = true;
    let usecase = ToggleAvailabilityUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
    };

    let result = usecase.execute(owner, property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_reset_cooldown_when_toggling() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let before = property.updated_at;
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();

    ToggleAvailabilityUseCase { properties }
        .execute(owner, property.id)
        .await
        .unwrap();
    assert_eq!(stored.lock().unwrap()[0].updated_at, before);
}

// ── UpdatePropertyUseCase (cooldown) ─────────────────────────────────────────

#[tokio::test]
async fn should_update_after_cooldown_and_restart_it() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let usecase = UpdatePropertyUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        mobiles: MockMobileRepo::empty(),
        cooldown_days: 30,
    };

    let updated = usecase
        .execute(
            owner,
            property.id,
            PropertyUpdate {
                title: Some("Renovated 2BHK".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renovated 2BHK");
    assert!(updated.updated_at > property.updated_at);

    let again = usecase
        .execute(
            owner,
            property.id,
            PropertyUpdate {
                title: Some("Another title".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(again, Err(MarketplaceError::EditCooldown { days_left: 30 })),
        "expected EditCooldown with 30 days left, got {again:?}"
    );
}

#[tokio::test]
async fn should_report_days_left_inside_cooldown() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.updated_at = Utc::now() - Duration::days(10);
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let usecase = UpdatePropertyUseCase {
        properties,
        mobiles: MockMobileRepo::empty(),
        cooldown_days: 30,
    };

    let result = usecase
        .execute(
            owner,
            property.id,
            PropertyUpdate {
                city: Some("Mysuru".to_owned()),
                ..Default::default()
            },
        )
        .await;

    assert!(
        matches!(result, Err(MarketplaceError::EditCooldown { days_left: 20 })),
        "expected EditCooldown with 20 days left, got {result:?}"
    );
    assert_eq!(stored.lock().unwrap()[0].city, "Bengaluru");
}

#[tokio::test]
async fn should_switch_listing_to_sale_terms() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let usecase = UpdatePropertyUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        mobiles: MockMobileRepo::empty(),
        cooldown_days: 30,
    };

    let updated = usecase
        .execute(
            owner,
            property.id,
            PropertyUpdate {
                terms: Some(ListingTerms::Sale {
                    sale_price: "1,20,00,000".to_owned(),
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.terms.price(), "1,20,00,000");
}

#[tokio::test]
async fn should_require_verified_number_when_changing_live_contact() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let usecase = UpdatePropertyUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        mobiles: MockMobileRepo::verified("9876543210"),
        cooldown_days: 30,
    };

    let result = usecase
        .execute(
            owner,
            property.id,
            PropertyUpdate {
                contact_number: Some("9000000000".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(
        matches!(result, Err(MarketplaceError::ContactNotVerified)),
        "expected ContactNotVerified, got {result:?}"
    );
}

// ── UpdateImagesUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_leave_draft_when_images_are_reissued() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_draft = true;
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let usecase = UpdateImagesUseCase {
        properties,
        mobiles: MockMobileRepo::verified("9876543210"),
        storage: FakeStorage::new(),
        cooldown_days: 30,
    };

    let (updated, urls) = usecase.execute(owner, property.id).await.unwrap();
    assert_eq!(updated.state(), ListingState::Available);
    assert_eq!(urls.len(), 5);
}

#[tokio::test]
async fn should_require_verified_contact_to_take_draft_live_through_images() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_draft = true;
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let usecase = UpdateImagesUseCase {
        properties,
        mobiles: MockMobileRepo::empty(),
        storage: FakeStorage::new(),
        cooldown_days: 30,
    };

    let result = usecase.execute(owner, property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::ContactNotVerified)),
        "expected ContactNotVerified, got {result:?}"
    );
    assert_eq!(stored.lock().unwrap()[0].state(), ListingState::Draft);
}

#[tokio::test]
async fn should_keep_paused_listing_paused_when_images_are_reissued() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_available = false;
    let usecase = UpdateImagesUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        mobiles: MockMobileRepo::empty(),
        storage: FakeStorage::new(),
        cooldown_days: 30,
    };

    let (updated, _) = usecase.execute(owner, property.id).await.unwrap();
    assert_eq!(updated.state(), ListingState::Paused);
}

#[tokio::test]
async fn should_allow_image_retry_right_after_failed_create() {
    let owner = Uuid::new_v4();
    let create = CreatePropertyUseCase {
        properties: MockPropertyRepo::empty(),
        mobiles: MockMobileRepo::verified("9876543210"),
        storage: FakeStorage::failing_puts(),
    };
    let created = create
        .execute(owner, new_rent_property(false, true))
        .await
        .unwrap();
    assert_eq!(created.warning, Some(IMAGE_URLS_WARNING));

    let retry = UpdateImagesUseCase {
        properties: create.properties,
        mobiles: create.mobiles,
        storage: FakeStorage::new(),
        cooldown_days: 30,
    };
    let (updated, urls) = retry.execute(owner, created.property.id).await.unwrap();
    assert_eq!(urls.len(), 5);
    assert_eq!(updated.state(), ListingState::Available);
}

#[tokio::test]
async fn should_gate_image_reissue_on_live_listing_by_cooldown() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.updated_at = Utc::now() - Duration::days(5);
    let usecase = UpdateImagesUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        mobiles: MockMobileRepo::empty(),
        storage: FakeStorage::new(),
        cooldown_days: 30,
    };

    let result = usecase.execute(owner, property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::EditCooldown { days_left: 25 })),
        "expected EditCooldown, got {result:?}"
    );
}

#[tokio::test]
async fn should_change_nothing_when_image_urls_cannot_be_issued() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_draft = true;
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let usecase = UpdateImagesUseCase {
        properties,
        mobiles: MockMobileRepo::verified("9876543210"),
        storage: FakeStorage::failing_puts(),
        cooldown_days: 30,
    };

    let result = usecase.execute(owner, property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
    let stored = stored.lock().unwrap();
    assert_eq!(stored[0].state(), ListingState::Draft);
    assert_eq!(stored[0].updated_at, property.updated_at);
}

// ── Publish / Delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_verified_contact_to_publish_draft() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_draft = true;
    let usecase = PublishPropertyUseCase {
        properties: MockPropertyRepo::new(vec![property.clone()]),
        mobiles: MockMobileRepo::empty(),
    };

    let result = usecase.execute(owner, property.id).await;
    assert!(
        matches!(result, Err(MarketplaceError::ContactNotVerified)),
        "expected ContactNotVerified, got {result:?}"
    );
}

#[tokio::test]
async fn should_publish_draft_with_verified_contact() {
    let owner = Uuid::new_v4();
    let mut property = test_property(owner);
    property.is_draft = true;
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let usecase = PublishPropertyUseCase {
        properties,
        mobiles: MockMobileRepo::verified(&property.contact_number),
    };

    usecase.execute(owner, property.id).await.unwrap();
    assert_eq!(stored.lock().unwrap()[0].state(), ListingState::Available);
}

#[tokio::test]
async fn should_soft_delete_and_then_report_not_found() {
    let owner = Uuid::new_v4();
    let property = test_property(owner);
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let usecase = DeletePropertyUseCase { properties };

    usecase.execute(owner, property.id).await.unwrap();
    assert_eq!(stored.lock().unwrap()[0].state(), ListingState::Deleted);

    let again = usecase.execute(owner, property.id).await;
    assert!(
        matches!(again, Err(MarketplaceError::PropertyNotFound)),
        "expected PropertyNotFound, got {again:?}"
    );
}
