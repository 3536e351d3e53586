use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::MarketplaceError;
use crate::state::AppState;
use crate::usecase::mobile_otp::{SendMobileOtpUseCase, VerifyMobileOtpUseCase};

#[derive(Serialize)]
pub struct MobileResponse {
    pub mobile: String,
    pub verified: bool,
}

// ── POST /mobile/send-otp ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub mobile: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<MobileResponse>, MarketplaceError> {
    let usecase = SendMobileOtpUseCase {
        repo: state.mobile_repo(),
    };
    usecase.execute(&body.mobile).await?;
    Ok(Json(MobileResponse {
        mobile: body.mobile,
        verified: false,
    }))
}

// ── POST /mobile/verify-otp ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub mobile: String,
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<MobileResponse>, MarketplaceError> {
    let usecase = VerifyMobileOtpUseCase {
        repo: state.mobile_repo(),
    };
    usecase.execute(&body.mobile, &body.otp).await?;
    Ok(Json(MobileResponse {
        mobile: body.mobile,
        verified: true,
    }))
}
