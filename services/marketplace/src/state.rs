use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use roofline_auth_types::identity::AccountJwtSecret;
use roofline_storage::s3::S3Storage;

use crate::config::MarketplaceConfig;
use crate::infra::db::{
    DbAccountRepository, DbAgreementRepository, DbContactRepository,
    DbMobileVerificationRepository, DbPropertyRepository, DbVerificationRepository,
    DbWishlistRepository,
};
use crate::infra::geocode::GoogleGeocoder;
use crate::infra::pdf::PrintPdfRenderer;

/// Tunables read once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub edit_cooldown_days: i64,
    pub verification_fee: i32,
    pub near_me_default_radius_km: f64,
}

impl From<&MarketplaceConfig> for Settings {
    fn from(config: &MarketplaceConfig) -> Self {
        Self {
            edit_cooldown_days: config.edit_cooldown_days,
            verification_fee: config.verification_fee,
            near_me_default_radius_km: config.near_me_default_radius_km,
        }
    }
}

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: Arc<str>,
    pub storage: S3Storage,
    pub geocoder: GoogleGeocoder,
    pub settings: Settings,
}

impl FromRef<AppState> for AccountJwtSecret {
    fn from_ref(state: &AppState) -> Self {
        AccountJwtSecret(Arc::clone(&state.jwt_secret))
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn mobile_repo(&self) -> DbMobileVerificationRepository {
        DbMobileVerificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn property_repo(&self) -> DbPropertyRepository {
        DbPropertyRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_repo(&self) -> DbVerificationRepository {
        DbVerificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn contact_repo(&self) -> DbContactRepository {
        DbContactRepository {
            db: self.db.clone(),
        }
    }

    pub fn wishlist_repo(&self) -> DbWishlistRepository {
        DbWishlistRepository {
            db: self.db.clone(),
        }
    }

    pub fn agreement_repo(&self) -> DbAgreementRepository {
        DbAgreementRepository {
            db: self.db.clone(),
        }
    }

    pub fn pdf_renderer(&self) -> PrintPdfRenderer {
        PrintPdfRenderer
    }
}
