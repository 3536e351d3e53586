use std::time::Duration;

use serde::Deserialize;

use roofline_core::config::Config;
use roofline_domain::geo::DEFAULT_NEAR_ME_RADIUS_KM;
use roofline_domain::listing::DEFAULT_EDIT_COOLDOWN_DAYS;
use roofline_domain::verification::DEFAULT_VERIFICATION_FEE;
use roofline_storage::s3::S3Settings;

/// Marketplace service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for account bearer tokens.
    pub jwt_secret: String,
    pub aws_region: String,
    pub aws_bucket_name: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Enables reverse geocoding of captured verification locations.
    #[serde(default)]
    pub google_maps_api_key: Option<String>,
    /// TCP port to listen on (default 3000). Env var: `MARKETPLACE_PORT`.
    #[serde(default = "default_port")]
    pub marketplace_port: u16,
    #[serde(default = "default_url_ttl")]
    pub presigned_url_ttl_secs: u64,
    #[serde(default = "default_radius")]
    pub near_me_default_radius_km: f64,
    #[serde(default = "default_fee")]
    pub verification_fee: i32,
    #[serde(default = "default_cooldown")]
    pub edit_cooldown_days: i64,
}

fn default_port() -> u16 {
    3000
}

fn default_url_ttl() -> u64 {
    3600
}

fn default_radius() -> f64 {
    DEFAULT_NEAR_ME_RADIUS_KM
}

fn default_fee() -> i32 {
    DEFAULT_VERIFICATION_FEE
}

fn default_cooldown() -> i64 {
    DEFAULT_EDIT_COOLDOWN_DAYS
}

impl Config for MarketplaceConfig {}

impl MarketplaceConfig {
    pub fn s3_settings(&self) -> S3Settings {
        S3Settings {
            region: self.aws_region.clone(),
            bucket: self.aws_bucket_name.clone(),
            access_key_id: self.aws_access_key_id.clone(),
            secret_access_key: self.aws_secret_access_key.clone(),
            url_ttl: Duration::from_secs(self.presigned_url_ttl_secs),
        }
    }
}
