use std::time::Duration;

use serde::Deserialize;

use roofline_core::config::Config;
use roofline_domain::verification::DEFAULT_VALIDITY_DAYS;
use roofline_storage::s3::S3Settings;

/// Admin service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for admin bearer tokens. Never shared with the marketplace.
    pub admin_jwt_secret: String,
    /// Redis connection URL for the login attempt counter.
    pub redis_url: String,
    pub aws_region: String,
    pub aws_bucket_name: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// TCP port to listen on (default 3001). Env var: `ADMIN_PORT`.
    #[serde(default = "default_port")]
    pub admin_port: u16,
    #[serde(default = "default_url_ttl")]
    pub presigned_url_ttl_secs: u64,
    /// Days an approval stays valid.
    #[serde(default = "default_validity_days")]
    pub verification_validity_days: i64,
    #[serde(default = "default_sweep_interval")]
    pub expiry_sweep_interval_secs: u64,
    #[serde(default = "default_login_max_attempts")]
    pub login_max_attempts: u32,
    #[serde(default = "default_login_window")]
    pub login_window_secs: u64,
}

fn default_port() -> u16 {
    3001
}

fn default_url_ttl() -> u64 {
    3600
}

fn default_validity_days() -> i64 {
    DEFAULT_VALIDITY_DAYS
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_login_max_attempts() -> u32 {
    5
}

fn default_login_window() -> u64 {
    900
}

impl Config for AdminConfig {}

impl AdminConfig {
    pub fn s3_settings(&self) -> S3Settings {
        S3Settings {
            region: self.aws_region.clone(),
            bucket: self.aws_bucket_name.clone(),
            access_key_id: self.aws_access_key_id.clone(),
            secret_access_key: self.aws_secret_access_key.clone(),
            url_ttl: Duration::from_secs(self.presigned_url_ttl_secs),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.expiry_sweep_interval_secs.max(1))
    }
}
