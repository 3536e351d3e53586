use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{PropertyRepository, WishlistRepository};
use crate::domain::types::WishlistItem;
use crate::error::MarketplaceError;

pub struct AddToWishlistUseCase<W: WishlistRepository, P: PropertyRepository> {
    pub wishlist: W,
    pub properties: P,
}

impl<W: WishlistRepository, P: PropertyRepository> AddToWishlistUseCase<W, P> {
    /// Returns `true` if the property was newly added.
    pub async fn execute(&self, user_id: Uuid, property_id: Uuid) -> Result<bool, MarketplaceError> {
        self.properties
            .find_by_id(property_id)
            .await?
            .filter(|p| !p.state().is_deleted())
            .ok_or(MarketplaceError::PropertyNotFound)?;
        self.wishlist.add(user_id, property_id, Utc::now()).await
    }
}

pub struct RemoveFromWishlistUseCase<W: WishlistRepository> {
    pub wishlist: W,
}

impl<W: WishlistRepository> RemoveFromWishlistUseCase<W> {
    pub async fn execute(&self, user_id: Uuid, property_id: Uuid) -> Result<(), MarketplaceError> {
        if !self.wishlist.remove(user_id, property_id).await? {
            return Err(MarketplaceError::PropertyNotFound);
        }
        Ok(())
    }
}

pub struct ListWishlistUseCase<W: WishlistRepository> {
    pub wishlist: W,
}

impl<W: WishlistRepository> ListWishlistUseCase<W> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<WishlistItem>, MarketplaceError> {
        self.wishlist.list(user_id).await
    }
}
