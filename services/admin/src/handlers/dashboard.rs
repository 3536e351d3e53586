use axum::{Json, extract::State};
use serde::Serialize;

use roofline_auth_types::identity::AdminIdentity;

use crate::domain::types::{DashboardStats, PaymentStatusCounts, PropertyCounts};
use crate::error::AdminError;
use crate::handlers::verification::StatusCountsResponse;
use crate::state::AppState;
use crate::usecase::dashboard::DashboardStatsUseCase;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCountsResponse {
    pub users: u64,
    pub owners: u64,
    pub total: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCountsResponse {
    pub live: u64,
    pub draft: u64,
    pub paused: u64,
    pub verified: u64,
}

impl From<PropertyCounts> for PropertyCountsResponse {
    fn from(c: PropertyCounts) -> Self {
        Self {
            live: c.live,
            draft: c.draft,
            paused: c.paused,
            verified: c.verified,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCountsResponse {
    pub pending: u64,
    pub completed: u64,
    pub failed: u64,
}

impl From<PaymentStatusCounts> for PaymentCountsResponse {
    fn from(c: PaymentStatusCounts) -> Self {
        Self {
            pending: c.pending,
            completed: c.completed,
            failed: c.failed,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub accounts: AccountCountsResponse,
    pub properties: PropertyCountsResponse,
    pub verifications: StatusCountsResponse,
    pub agreements: PaymentCountsResponse,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(s: DashboardStats) -> Self {
        Self {
            accounts: AccountCountsResponse {
                users: s.users,
                owners: s.owners,
                total: s.users + s.owners,
            },
            properties: s.properties.into(),
            verifications: s.verifications.into(),
            agreements: s.agreements.into(),
        }
    }
}

// ── GET /dashboard/stats ─────────────────────────────────────────────────────

pub async fn dashboard_stats(
    identity: AdminIdentity,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AdminError> {
    let usecase = DashboardStatsUseCase {
        admins: state.admin_repo(),
        dashboard: state.dashboard_repo(),
    };
    Ok(Json(usecase.execute(&identity).await?.into()))
}
