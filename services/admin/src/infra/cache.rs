use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, RedisError, cmd};

use crate::domain::repository::LoginAttemptStore;
use crate::error::AdminError;

/// Fixed-window failed-login counter. The window opens on the first failure and the
/// key expires with it.
#[derive(Clone)]
pub struct RedisLoginAttempts {
    pub pool: Pool,
    pub window_secs: u64,
}

/// INCR and EXPIRE in one script so the counter can never outlive its window.
/// A key found without a TTL gets one on the next failure.
const RECORD_FAILURE_SCRIPT: &str = r"
local count = redis.call('INCR', KEYS[1])
if count == 1 or redis.call('TTL', KEYS[1]) == -1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return count
";

fn attempts_key(email: &str) -> String {
    format!("admin_login_attempts:{email}")
}

impl RedisLoginAttempts {
    async fn conn(&self) -> Result<deadpool_redis::Connection, AdminError> {
        self.pool
            .get()
            .await
            .map_err(|e| AdminError::Internal(e.into()))
    }
}

impl LoginAttemptStore for RedisLoginAttempts {
    async fn failures(&self, email: &str) -> Result<u32, AdminError> {
        let mut conn = self.conn().await?;
        let count: Option<u32> = conn
            .get(attempts_key(email))
            .await
            .map_err(|e: RedisError| AdminError::Internal(e.into()))?;
        Ok(count.unwrap_or(0))
    }

    async fn record_failure(&self, email: &str) -> Result<u32, AdminError> {
        let mut conn = self.conn().await?;
        let count: u32 = cmd("EVAL")
            .arg(RECORD_FAILURE_SCRIPT)
            .arg(1)
            .arg(attempts_key(email))
            .arg(self.window_secs)
            .query_async(&mut *conn)
            .await
            .map_err(|e: RedisError| AdminError::Internal(e.into()))?;
        Ok(count)
    }

    async fn clear(&self, email: &str) -> Result<(), AdminError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .del(attempts_key(email))
            .await
            .map_err(|e: RedisError| AdminError::Internal(e.into()))?;
        Ok(())
    }
}
