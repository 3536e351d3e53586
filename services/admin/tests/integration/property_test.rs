use uuid::Uuid;

use roofline_domain::account::PermissionSet;
use roofline_domain::listing::ListingState;
use roofline_domain::pagination::PageRequest;
use roofline_testing::storage::FakeStorage;

use roofline_admin::domain::types::{Admin, PropertyFilter};
use roofline_admin::error::AdminError;
use roofline_admin::usecase::property::{
    DeletePropertyUseCase, GetPropertyUseCase, ListPropertiesUseCase,
    SetPropertyAvailabilityUseCase,
};

use crate::helpers::{
    MockActivityLog, MockAdminRepo, MockPropertyRepo, employee, identity, test_property,
};

fn listings_moderator() -> Admin {
    employee(PermissionSet {
        can_manage_properties: true,
        ..PermissionSet::default()
    })
}

#[tokio::test]
async fn should_filter_listings_by_state() {
    let staff = listings_moderator();
    let live = test_property(Uuid::new_v4());
    let mut paused = test_property(Uuid::new_v4());
    paused.is_available = false;

    let found = ListPropertiesUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        properties: MockPropertyRepo::new(vec![live, paused.clone()]),
    }
    .execute(
        &identity(&staff),
        PropertyFilter {
            state: Some(ListingState::Paused),
            ..PropertyFilter::default()
        },
        PageRequest::default(),
    )
    .await
    .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, paused.id);
}

#[tokio::test]
async fn should_include_image_urls_on_detail() {
    let staff = listings_moderator();
    let property = test_property(Uuid::new_v4());

    let (found, images) = GetPropertyUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        properties: MockPropertyRepo::new(vec![property.clone()]),
        storage: FakeStorage::new(),
    }
    .execute(&identity(&staff), property.id)
    .await
    .unwrap();

    assert_eq!(found.id, property.id);
    let first = images.first.unwrap();
    assert!(first.starts_with("https://storage.test/"));
    assert!(first.contains(&property.id.to_string()));
}

#[tokio::test]
async fn should_pause_listing_without_touching_edit_timestamp() {
    let staff = listings_moderator();
    let property = test_property(Uuid::new_v4());
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    let updated = SetPropertyAvailabilityUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        properties,
        log,
    }
    .execute(&identity(&staff), property.id, false)
    .await
    .unwrap();

    assert_eq!(updated.state(), ListingState::Paused);
    assert_eq!(updated.updated_at, property.updated_at);
    let stored = stored.lock().unwrap();
    assert!(!stored[0].is_available);
    assert_eq!(stored[0].updated_at, property.updated_at);
    assert_eq!(
        entries.lock().unwrap()[0].action,
        "UPDATE_PROPERTY_AVAILABILITY"
    );
}

#[tokio::test]
async fn should_refuse_availability_change_on_draft() {
    let staff = listings_moderator();
    let mut draft = test_property(Uuid::new_v4());
    draft.is_draft = true;

    let result = SetPropertyAvailabilityUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        properties: MockPropertyRepo::new(vec![draft.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&staff), draft.id, false)
    .await;

    assert!(
        matches!(result, Err(AdminError::InvalidState(_))),
        "expected InvalidState, got {result:?}"
    );
}

#[tokio::test]
async fn should_soft_delete_listing() {
    let staff = listings_moderator();
    let property = test_property(Uuid::new_v4());
    let properties = MockPropertyRepo::new(vec![property.clone()]);
    let stored = properties.properties_handle();
    let log = MockActivityLog::default();
    let entries = log.entries_handle();

    DeletePropertyUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        properties,
        log,
    }
    .execute(&identity(&staff), property.id)
    .await
    .unwrap();

    assert_eq!(stored.lock().unwrap()[0].state(), ListingState::Deleted);
    assert_eq!(entries.lock().unwrap()[0].action, "DELETE_PROPERTY");
}

#[tokio::test]
async fn should_treat_deleted_listing_as_missing() {
    let staff = listings_moderator();
    let mut deleted = test_property(Uuid::new_v4());
    deleted.is_draft = true;
    deleted.is_available = false;

    let result = DeletePropertyUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        properties: MockPropertyRepo::new(vec![deleted.clone()]),
        log: MockActivityLog::default(),
    }
    .execute(&identity(&staff), deleted.id)
    .await;

    assert!(
        matches!(result, Err(AdminError::PropertyNotFound)),
        "expected PropertyNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_forbid_listing_moderation_without_permission() {
    let staff = employee(PermissionSet::default());

    let result = ListPropertiesUseCase {
        admins: MockAdminRepo::new(vec![staff.clone()]),
        properties: MockPropertyRepo::new(vec![]),
    }
    .execute(
        &identity(&staff),
        PropertyFilter::default(),
        PageRequest::default(),
    )
    .await;

    assert!(
        matches!(result, Err(AdminError::PermissionDenied("canManageProperties"))),
        "expected PermissionDenied, got {result:?}"
    );
}
