use chrono::{DateTime, Utc};
use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::types::{OTP_LEN, OutboxEvent};
use crate::error::MarketplaceError;

pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Check a submitted code. Expiry is checked first, so a stale code always reports
/// `OtpExpired` even when it also mismatches.
pub fn check_otp(
    stored: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), MarketplaceError> {
    let (Some(stored), Some(expires_at)) = (stored, expires_at) else {
        return Err(MarketplaceError::InvalidOtp);
    };
    if now > expires_at {
        return Err(MarketplaceError::OtpExpired);
    }
    if stored != submitted.trim() {
        return Err(MarketplaceError::InvalidOtp);
    }
    Ok(())
}

/// Outbox event carrying an OTP to `recipient`. The key is unique per issued code.
pub fn otp_event(kind: &str, recipient: serde_json::Value, otp: &str) -> OutboxEvent {
    let id = Uuid::new_v4();
    OutboxEvent {
        id,
        kind: kind.to_owned(),
        payload: json!({ "to": recipient, "otp": otp }),
        idempotency_key: format!("{kind}:{id}"),
    }
}
