use std::time::Duration;

use chrono::Utc;

use crate::domain::repository::ExpirySweeper;
use crate::error::AdminError;

pub struct ExpirySweepUseCase<S: ExpirySweeper> {
    pub sweeper: S,
}

impl<S: ExpirySweeper> ExpirySweepUseCase<S> {
    pub async fn execute(&self) -> Result<u64, AdminError> {
        let expired = self.sweeper.expire_lapsed(Utc::now()).await?;
        if expired > 0 {
            tracing::info!(expired, "expired lapsed property verifications");
        }
        Ok(expired)
    }

    /// Sweep every `interval` until the task is dropped. A failed pass is logged and
    /// retried on the next tick.
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.execute().await {
                tracing::warn!(error = ?e, "verification expiry sweep failed");
            }
        }
    }
}
