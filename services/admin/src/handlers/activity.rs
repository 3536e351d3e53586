use axum::{
    Json,
    extract::{RawQuery, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::pagination::PageRequest;

use crate::domain::types::ActivityEntry;
use crate::error::AdminError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::activity::ListActivityUseCase;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub admin_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub details: serde_json::Value,
    #[serde(serialize_with = "roofline_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ActivityEntry> for ActivityResponse {
    fn from(e: ActivityEntry) -> Self {
        Self {
            id: e.id.to_string(),
            admin_id: e.admin_id.to_string(),
            action: e.action,
            entity_type: e.entity_type,
            entity_id: e.entity_id.map(|id| id.to_string()),
            details: e.details,
            created_at: e.created_at,
        }
    }
}

// ── GET /activity-logs ───────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub admin_id: Option<Uuid>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_activity(
    identity: AdminIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<ActivityResponse>>, AdminError> {
    let query: ActivityQuery = parse_query(raw_query)?;
    let usecase = ListActivityUseCase {
        admins: state.admin_repo(),
        log: state.activity_repo(),
    };
    let entries = usecase
        .execute(
            &identity,
            query.admin_id,
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
