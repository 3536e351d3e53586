//! In-memory stand-in for the S3 presigner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use roofline_storage::ObjectStorage;

/// Returns deterministic `https://storage.test/...` URLs. Flip `fail_puts` or `fail_gets`
/// to simulate a signing outage.
#[derive(Clone, Default)]
pub struct FakeStorage {
    fail_puts: Arc<AtomicBool>,
    fail_gets: Arc<AtomicBool>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_puts() -> Self {
        let storage = Self::default();
        storage.fail_puts.store(true, Ordering::SeqCst);
        storage
    }

    pub fn failing_gets() -> Self {
        let storage = Self::default();
        storage.fail_gets.store(true, Ordering::SeqCst);
        storage
    }
}

impl ObjectStorage for FakeStorage {
    async fn presign_get(&self, key: &str) -> anyhow::Result<String> {
        if self.fail_gets.load(Ordering::SeqCst) {
            anyhow::bail!("storage unavailable");
        }
        Ok(format!("https://storage.test/{key}?op=get"))
    }

    async fn presign_put(&self, key: &str) -> anyhow::Result<String> {
        if self.fail_puts.load(Ordering::SeqCst) {
            anyhow::bail!("storage unavailable");
        }
        Ok(format!("https://storage.test/{key}?op=put"))
    }
}
