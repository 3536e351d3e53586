use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{AccountRepository, ContactRepository, PropertyRepository};
use crate::domain::types::{Contact, PropertySummary};
use crate::error::MarketplaceError;

// ── ContactOwner ─────────────────────────────────────────────────────────────

pub struct ContactOwnerUseCase<C, P, A>
where
    C: ContactRepository,
    P: PropertyRepository,
    A: AccountRepository,
{
    pub contacts: C,
    pub properties: P,
    pub accounts: A,
}

impl<C, P, A> ContactOwnerUseCase<C, P, A>
where
    C: ContactRepository,
    P: PropertyRepository,
    A: AccountRepository,
{
    /// Returns the contact row and the owner's contact number.
    pub async fn execute(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        message: Option<String>,
    ) -> Result<(Contact, String), MarketplaceError> {
        let property = self
            .properties
            .find_by_id(property_id)
            .await?
            .filter(|p| p.state().is_live())
            .ok_or(MarketplaceError::PropertyNotFound)?;

        if let Some(mut existing) = self.contacts.find_for_user(user_id, property_id).await? {
            if existing.user_deleted {
                self.contacts.restore_for_user(existing.id).await?;
                existing.user_deleted = false;
            }
            return Ok((existing, property.contact_number));
        }

        let user = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or(MarketplaceError::AccountNotFound)?;
        let contact = Contact {
            id: Uuid::now_v7(),
            property_id,
            user_id,
            user_name: user.name,
            user_phone: user.phone,
            message,
            user_deleted: false,
            owner_deleted: false,
            created_at: Utc::now(),
        };
        self.contacts.create(&contact).await?;
        Ok((contact, property.contact_number))
    }
}

// ── Lists ────────────────────────────────────────────────────────────────────

pub struct ListMyContactsUseCase<C: ContactRepository> {
    pub contacts: C,
}

impl<C: ContactRepository> ListMyContactsUseCase<C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError> {
        self.contacts.list_for_user(user_id).await
    }
}

pub struct ListLeadsUseCase<C: ContactRepository> {
    pub contacts: C,
}

impl<C: ContactRepository> ListLeadsUseCase<C> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<(Contact, PropertySummary)>, MarketplaceError> {
        self.contacts.list_for_owner(owner_id).await
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

/// Which side of the contact is hiding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSide {
    User,
    Owner,
}

pub struct DeleteContactUseCase<C: ContactRepository> {
    pub contacts: C,
    pub side: ContactSide,
}

impl<C: ContactRepository> DeleteContactUseCase<C> {
    pub async fn execute(&self, account_id: Uuid, contact_id: Uuid) -> Result<(), MarketplaceError> {
        let hidden = match self.side {
            ContactSide::User => self.contacts.hide_for_user(contact_id, account_id).await?,
            ContactSide::Owner => self.contacts.hide_for_owner(contact_id, account_id).await?,
        };
        if !hidden {
            return Err(MarketplaceError::ContactNotFound);
        }
        Ok(())
    }
}
