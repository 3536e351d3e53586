use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use roofline_auth_types::identity::AdminJwtSecret;
use roofline_storage::s3::S3Storage;

use crate::config::AdminConfig;
use crate::infra::cache::RedisLoginAttempts;
use crate::infra::db::{
    DbAccountAdminRepository, DbActivityLogRepository, DbAdminRepository,
    DbAgreementAdminRepository, DbDashboardRepository, DbExpirySweeper,
    DbPropertyAdminRepository, DbVerificationAdminRepository,
};

/// Tunables read once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub validity_days: i64,
    pub login_max_attempts: u32,
    pub login_window_secs: u64,
}

impl From<&AdminConfig> for Settings {
    fn from(config: &AdminConfig) -> Self {
        Self {
            validity_days: config.verification_validity_days,
            login_max_attempts: config.login_max_attempts,
            login_window_secs: config.login_window_secs,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: deadpool_redis::Pool,
    pub jwt_secret: Arc<str>,
    pub storage: S3Storage,
    pub settings: Settings,
}

impl FromRef<AppState> for AdminJwtSecret {
    fn from_ref(state: &AppState) -> Self {
        AdminJwtSecret(Arc::clone(&state.jwt_secret))
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl AppState {
    pub fn admin_repo(&self) -> DbAdminRepository {
        DbAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn login_attempts(&self) -> RedisLoginAttempts {
        RedisLoginAttempts {
            pool: self.redis.clone(),
            window_secs: self.settings.login_window_secs,
        }
    }

    pub fn verification_repo(&self) -> DbVerificationAdminRepository {
        DbVerificationAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_repo(&self) -> DbAccountAdminRepository {
        DbAccountAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn property_repo(&self) -> DbPropertyAdminRepository {
        DbPropertyAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn agreement_repo(&self) -> DbAgreementAdminRepository {
        DbAgreementAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn dashboard_repo(&self) -> DbDashboardRepository {
        DbDashboardRepository {
            db: self.db.clone(),
        }
    }

    pub fn activity_repo(&self) -> DbActivityLogRepository {
        DbActivityLogRepository {
            db: self.db.clone(),
        }
    }

    pub fn expiry_sweeper(&self) -> DbExpirySweeper {
        DbExpirySweeper {
            db: self.db.clone(),
        }
    }
}
