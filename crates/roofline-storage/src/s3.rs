use std::time::Duration;

use anyhow::Context as _;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;

use crate::ObjectStorage;

/// Static S3 credentials and bucket settings (`AWS_*` env vars).
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub url_ttl: Duration,
}

/// S3-backed [`ObjectStorage`]. Cheap to clone; the SDK client is reference-counted.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    url_ttl: Duration,
}

impl S3Storage {
    pub fn new(settings: S3Settings) -> Self {
        let credentials = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "roofline-env",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region))
            .credentials_provider(credentials)
            .build();
        Self {
            client: Client::from_conf(config),
            bucket: settings.bucket,
            url_ttl: settings.url_ttl,
        }
    }

    fn presigning(&self) -> anyhow::Result<PresigningConfig> {
        PresigningConfig::expires_in(self.url_ttl).context("build presigning config")
    }
}

impl ObjectStorage for S3Storage {
    async fn presign_get(&self, key: &str) -> anyhow::Result<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(self.presigning()?)
            .await
            .with_context(|| format!("presign GET {key}"))?;
        Ok(request.uri().to_string())
    }

    async fn presign_put(&self, key: &str) -> anyhow::Result<String> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("image/jpeg")
            .presigned(self.presigning()?)
            .await
            .with_context(|| format!("presign PUT {key}"))?;
        Ok(request.uri().to_string())
    }
}
