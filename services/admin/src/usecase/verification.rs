use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::Permission;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::{
    PropertyVerificationStatus, RequestStatus, ReviewDecision,
};
use roofline_storage::{ObjectStorage, resolve_get_urls};

use crate::domain::repository::{
    ActivityLogRepository, AdminRepository, VerificationAdminRepository,
};
use crate::domain::types::{
    Action, ActivityEntry, Admin, Approval, EntityKind, Rejection, RequestStatusCounts,
    VerificationRequest, VerificationScope,
};
use crate::error::AdminError;
use crate::usecase::access::{authorize, load_actor, record, require_main_admin};

/// A request with presigned GET URLs for its photos, in key order.
#[derive(Debug, Clone)]
pub struct VerificationView {
    pub request: VerificationRequest,
    pub photo_urls: Vec<Option<String>>,
}

async fn load_request<V: VerificationAdminRepository>(
    requests: &V,
    id: Uuid,
) -> Result<VerificationRequest, AdminError> {
    requests
        .find_by_id(id)
        .await?
        .ok_or(AdminError::RequestNotFound)
}

// ── List / Stats ─────────────────────────────────────────────────────────────

pub struct ListVerificationsUseCase<A, V, S>
where
    A: AdminRepository,
    V: VerificationAdminRepository,
    S: ObjectStorage,
{
    pub admins: A,
    pub requests: V,
    pub storage: S,
}

impl<A, V, S> ListVerificationsUseCase<A, V, S>
where
    A: AdminRepository,
    V: VerificationAdminRepository,
    S: ObjectStorage,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        status: Option<RequestStatus>,
        page: PageRequest,
    ) -> Result<Vec<VerificationView>, AdminError> {
        let actor = authorize(&self.admins, identity, Permission::VerifyProperties).await?;
        let requests = self
            .requests
            .list(VerificationScope::for_admin(&actor), status, page)
            .await?;
        let mut views = Vec::with_capacity(requests.len());
        for request in requests {
            let photo_urls = resolve_get_urls(&self.storage, &request.photo_keys).await;
            views.push(VerificationView {
                request,
                photo_urls,
            });
        }
        Ok(views)
    }
}

pub struct VerificationStatsUseCase<A: AdminRepository, V: VerificationAdminRepository> {
    pub admins: A,
    pub requests: V,
}

impl<A: AdminRepository, V: VerificationAdminRepository> VerificationStatsUseCase<A, V> {
    pub async fn execute(&self, identity: &AdminIdentity) -> Result<RequestStatusCounts, AdminError> {
        let actor = authorize(&self.admins, identity, Permission::VerifyProperties).await?;
        self.requests
            .count_by_status(VerificationScope::for_admin(&actor))
            .await
    }
}

// ── Assign ───────────────────────────────────────────────────────────────────

pub struct AssignVerificationUseCase<A, V, L>
where
    A: AdminRepository,
    V: VerificationAdminRepository,
    L: ActivityLogRepository,
{
    pub admins: A,
    pub requests: V,
    pub log: L,
}

impl<A, V, L> AssignVerificationUseCase<A, V, L>
where
    A: AdminRepository,
    V: VerificationAdminRepository,
    L: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        request_id: Uuid,
        assignee_id: Uuid,
    ) -> Result<VerificationRequest, AdminError> {
        let actor = load_actor(&self.admins, identity).await?;
        require_main_admin(&actor)?;

        let assignee = self
            .admins
            .find_by_id(assignee_id)
            .await?
            .ok_or(AdminError::AdminNotFound)?;
        if !assignee.is_active || !assignee.allows(Permission::VerifyProperties) {
            return Err(AdminError::Validation(
                "assignee must be an active admin with canVerifyProperties".to_owned(),
            ));
        }

        let mut request = load_request(&self.requests, request_id).await?;
        if request.status.is_terminal() {
            return Err(AdminError::InvalidState("request is already closed"));
        }
        if !self.requests.assign(request_id, assignee_id).await? {
            return Err(AdminError::InvalidState("request is already closed"));
        }
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::AssignVerification,
                EntityKind::VerificationRequest,
                Some(request_id),
                json!({ "assignedTo": assignee_id, "previous": request.assigned_to }),
            ),
        )
        .await?;
        tracing::info!(%request_id, %assignee_id, "verification assigned");
        request.assigned_to = Some(assignee_id);
        request.updated_at = Utc::now();
        Ok(request)
    }
}

// ── Review ───────────────────────────────────────────────────────────────────

pub struct ReviewInput {
    pub decision: ReviewDecision,
    pub notes: Option<String>,
}

/// Outcome of a review together with the property status it produced.
#[derive(Debug, Clone)]
pub struct Reviewed {
    pub request: VerificationRequest,
    pub property_status: PropertyVerificationStatus,
}

pub struct ReviewVerificationUseCase<A, V, L>
where
    A: AdminRepository,
    V: VerificationAdminRepository,
    L: ActivityLogRepository,
{
    pub admins: A,
    pub requests: V,
    pub log: L,
    pub validity_days: i64,
}

fn may_review(actor: &Admin, request: &VerificationRequest) -> Result<(), AdminError> {
    if actor.is_main_admin() {
        return Ok(());
    }
    match request.assigned_to {
        Some(assignee) if assignee != actor.id => Err(AdminError::NotAssignee),
        _ => Ok(()),
    }
}

impl<A, V, L> ReviewVerificationUseCase<A, V, L>
where
    A: AdminRepository,
    V: VerificationAdminRepository,
    L: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        request_id: Uuid,
        input: ReviewInput,
    ) -> Result<Reviewed, AdminError> {
        let actor = authorize(&self.admins, identity, Permission::VerifyProperties).await?;
        let mut request = load_request(&self.requests, request_id).await?;
        may_review(&actor, &request)?;
        if request.status != RequestStatus::UnderReview {
            return Err(AdminError::InvalidState("request is not under review"));
        }

        let notes = input.notes.filter(|n| !n.trim().is_empty());
        let now = Utc::now();
        let property_status = match input.decision {
            ReviewDecision::Approved => {
                let approval = Approval {
                    request_id,
                    property_id: request.property_id,
                    reviewer_id: actor.id,
                    notes: notes.clone(),
                    valid_from: now,
                    valid_until: now + Duration::days(self.validity_days),
                };
                if !self.requests.approve(&approval).await? {
                    return Err(AdminError::InvalidState("request is not under review"));
                }
                request.valid_from = Some(approval.valid_from);
                request.valid_until = Some(approval.valid_until);
                PropertyVerificationStatus::Verified
            }
            ReviewDecision::Rejected => {
                let rejection = Rejection {
                    request_id,
                    property_id: request.property_id,
                    reviewer_id: actor.id,
                    notes: notes.clone(),
                    reviewed_at: now,
                };
                if !self.requests.reject(&rejection).await? {
                    return Err(AdminError::InvalidState("request is not under review"));
                }
                PropertyVerificationStatus::NotVerified
            }
        };

        request.status = input.decision.as_request_status();
        request.reviewed_by = Some(actor.id);
        request.review_notes = notes;
        request.updated_at = now;

        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::ReviewVerification,
                EntityKind::VerificationRequest,
                Some(request_id),
                json!({
                    "decision": input.decision,
                    "propertyId": request.property_id,
                    "validUntil": request.valid_until,
                    "notes": request.review_notes,
                }),
            ),
        )
        .await?;
        tracing::info!(
            %request_id,
            property_id = %request.property_id,
            decision = request.status.as_str(),
            "verification reviewed"
        );
        Ok(Reviewed {
            request,
            property_status,
        })
    }
}
