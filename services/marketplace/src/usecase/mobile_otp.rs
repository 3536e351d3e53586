use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::MobileVerificationRepository;
use crate::domain::types::{MOBILE_OTP_TTL_SECS, MobileVerification, OUTBOX_WHATSAPP_OTP};
use crate::error::MarketplaceError;
use crate::usecase::otp::{check_otp, generate_otp, otp_event};

/// Ten ASCII digits.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.bytes().all(|b| b.is_ascii_digit())
}

// ── SendOtp ──────────────────────────────────────────────────────────────────

pub struct SendMobileOtpUseCase<R: MobileVerificationRepository> {
    pub repo: R,
}

impl<R: MobileVerificationRepository> SendMobileOtpUseCase<R> {
    pub async fn execute(&self, mobile: &str) -> Result<(), MarketplaceError> {
        if !is_valid_mobile(mobile) {
            return Err(MarketplaceError::Validation(
                "mobile: must be 10 digits".to_owned(),
            ));
        }
        let otp = generate_otp();
        let now = Utc::now();
        let record = MobileVerification {
            id: Uuid::new_v4(),
            mobile: mobile.to_owned(),
            otp: otp.clone(),
            expires_at: now + Duration::seconds(MOBILE_OTP_TTL_SECS),
            verified: false,
            created_at: now,
            updated_at: now,
        };
        let event = otp_event(OUTBOX_WHATSAPP_OTP, json!(mobile), &otp);
        self.repo.upsert_with_outbox(&record, &event).await
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyMobileOtpUseCase<R: MobileVerificationRepository> {
    pub repo: R,
}

impl<R: MobileVerificationRepository> VerifyMobileOtpUseCase<R> {
    pub async fn execute(&self, mobile: &str, otp: &str) -> Result<(), MarketplaceError> {
        let record = self
            .repo
            .find_by_mobile(mobile)
            .await?
            .ok_or(MarketplaceError::MobileNotFound)?;
        check_otp(Some(&record.otp), Some(record.expires_at), otp, Utc::now())?;
        self.repo.mark_verified(mobile).await
    }
}

/// `true` when `mobile` completed WhatsApp verification.
pub async fn is_mobile_verified<R: MobileVerificationRepository>(
    repo: &R,
    mobile: &str,
) -> Result<bool, MarketplaceError> {
    Ok(repo
        .find_by_mobile(mobile)
        .await?
        .is_some_and(|record| record.verified))
}
