pub mod account;
pub mod agreement;
pub mod contact;
pub mod mobile;
pub mod property;
pub mod search;
pub mod verification;
pub mod wishlist;

use roofline_auth_types::identity::AccountIdentity;

use crate::error::MarketplaceError;
use crate::state::AppState;
use crate::usecase::account::load_active_account;

/// Re-read the token's account so deleted or deactivated accounts lose access
/// before their token expires.
pub(crate) async fn ensure_active(
    state: &AppState,
    identity: &AccountIdentity,
) -> Result<(), MarketplaceError> {
    load_active_account(&state.account_repo(), identity.account_id).await?;
    Ok(())
}
