use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::UserIdentity;

use crate::error::MarketplaceError;
use crate::handlers::ensure_active;
use crate::handlers::contact::PropertySummaryResponse;
use crate::state::AppState;
use crate::usecase::wishlist::{
    AddToWishlistUseCase, ListWishlistUseCase, RemoveFromWishlistUseCase,
};

// ── GET /user/wishlist ───────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemResponse {
    pub property: PropertySummaryResponse,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub added_at: chrono::DateTime<chrono::Utc>,
}

pub async fn list_wishlist(
    UserIdentity(identity): UserIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<WishlistItemResponse>>, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = ListWishlistUseCase {
        wishlist: state.wishlist_repo(),
    };
    let items = usecase.execute(identity.account_id).await?;
    Ok(Json(
        items
            .into_iter()
            .map(|item| WishlistItemResponse {
                property: item.property.into(),
                added_at: item.added_at,
            })
            .collect(),
    ))
}

// ── POST /user/wishlist ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    pub property_id: Uuid,
}

/// 201 on first add, 200 when the entry already existed.
pub async fn add_to_wishlist(
    UserIdentity(identity): UserIdentity,
    State(state): State<AppState>,
    Json(body): Json<AddToWishlistRequest>,
) -> Result<StatusCode, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = AddToWishlistUseCase {
        wishlist: state.wishlist_repo(),
        properties: state.property_repo(),
    };
    let added = usecase.execute(identity.account_id, body.property_id).await?;
    Ok(if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

// ── DELETE /user/wishlist/{propertyId} ───────────────────────────────────────

pub async fn remove_from_wishlist(
    UserIdentity(identity): UserIdentity,
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Result<StatusCode, MarketplaceError> {
    ensure_active(&state, &identity).await?;
    let usecase = RemoveFromWishlistUseCase {
        wishlist: state.wishlist_repo(),
    };
    usecase.execute(identity.account_id, property_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
