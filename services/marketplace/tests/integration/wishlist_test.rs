use uuid::Uuid;

use roofline_marketplace::error::MarketplaceError;
use roofline_marketplace::usecase::wishlist::{
    AddToWishlistUseCase, ListWishlistUseCase, RemoveFromWishlistUseCase,
};

use crate::helpers::{MockPropertyRepo, MockWishlistRepo, test_property};

#[tokio::test]
async fn should_add_once_and_report_existing_entry() {
    let user = Uuid::new_v4();
    let property = test_property(Uuid::new_v4());
    let wishlist = MockWishlistRepo::new(vec![property.clone()]);
    let entries = wishlist.entries_handle();
    let usecase = AddToWishlistUseCase {
        wishlist,
        properties: MockPropertyRepo::new(vec![property.clone()]),
    };

    assert!(usecase.execute(user, property.id).await.unwrap());
    assert!(!usecase.execute(user, property.id).await.unwrap());
    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_unknown_property() {
    let usecase = AddToWishlistUseCase {
        wishlist: MockWishlistRepo::new(vec![]),
        properties: MockPropertyRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(MarketplaceError::PropertyNotFound)),
        "expected PropertyNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_skip_deleted_listings_when_listing() {
    let user = Uuid::new_v4();
    let kept = test_property(Uuid::new_v4());
    let mut gone = test_property(Uuid::new_v4());
    let wishlist = MockWishlistRepo::new(vec![kept.clone(), gone.clone()]);
    let add = AddToWishlistUseCase {
        wishlist,
        properties: MockPropertyRepo::new(vec![kept.clone(), gone.clone()]),
    };
    add.execute(user, kept.id).await.unwrap();
    add.execute(user, gone.id).await.unwrap();

    gone.is_draft = true;
    gone.is_available = false;
    let wishlist = MockWishlistRepo {
        entries: add.wishlist.entries_handle(),
        properties: vec![kept.clone(), gone],
    };
    let listed = ListWishlistUseCase { wishlist }.execute(user).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].property.id, kept.id);
}

#[tokio::test]
async fn should_report_missing_entry_on_remove() {
    let user = Uuid::new_v4();
    let property = test_property(Uuid::new_v4());
    let add = AddToWishlistUseCase {
        wishlist: MockWishlistRepo::new(vec![property.clone()]),
        properties: MockPropertyRepo::new(vec![property.clone()]),
    };
    add.execute(user, property.id).await.unwrap();

    let remove = RemoveFromWishlistUseCase {
        wishlist: add.wishlist,
    };
    remove.execute(user, property.id).await.unwrap();
    let again = remove.execute(user, property.id).await;
    assert!(
        matches!(again, Err(MarketplaceError::PropertyNotFound)),
        "expected PropertyNotFound, got {again:?}"
    );
}
