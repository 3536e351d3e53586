use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use roofline_auth_types::identity::AdminIdentity;
use roofline_domain::account::Permission;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::PaymentStatus;

use crate::domain::repository::{
    ActivityLogRepository, AdminRepository, AgreementAdminRepository,
};
use crate::domain::types::{Action, ActivityEntry, AgreementFilter, AgreementRecord, EntityKind};
use crate::error::AdminError;
use crate::usecase::access::{authorize, record};

pub struct ListAgreementsUseCase<A: AdminRepository, R: AgreementAdminRepository> {
    pub admins: A,
    pub agreements: R,
}

impl<A: AdminRepository, R: AgreementAdminRepository> ListAgreementsUseCase<A, R> {
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        filter: AgreementFilter,
        page: PageRequest,
    ) -> Result<Vec<AgreementRecord>, AdminError> {
        authorize(&self.admins, identity, Permission::ManageAgreements).await?;
        self.agreements.list(&filter, page).await
    }
}

/// Reconcile an agreement's payment with the gateway.
///
/// Unlike the account-side flow, staff may move between any two statuses, including
/// reverting a completed payment after a refund. Setting the current status again is
/// rejected so the activity log only holds real changes.
pub struct UpdateAgreementPaymentUseCase<A, R, L>
where
    A: AdminRepository,
    R: AgreementAdminRepository,
    L: ActivityLogRepository,
{
    pub admins: A,
    pub agreements: R,
    pub log: L,
}

impl<A, R, L> UpdateAgreementPaymentUseCase<A, R, L>
where
    A: AdminRepository,
    R: AgreementAdminRepository,
    L: ActivityLogRepository,
{
    pub async fn execute(
        &self,
        identity: &AdminIdentity,
        id: Uuid,
        status: PaymentStatus,
        reference: Option<String>,
    ) -> Result<AgreementRecord, AdminError> {
        let actor = authorize(&self.admins, identity, Permission::ManageAgreements).await?;
        let agreement = self
            .agreements
            .find_by_id(id)
            .await?
            .ok_or(AdminError::AgreementNotFound)?;
        if agreement.payment_status == status {
            return Err(AdminError::InvalidState("payment already has this status"));
        }
        let reference = reference
            .filter(|r| !r.trim().is_empty())
            .or(agreement.payment_reference.clone());
        self.agreements
            .set_payment(id, status, reference.as_deref())
            .await?;
        record(
            &self.log,
            ActivityEntry::new(
                actor.id,
                Action::UpdateAgreementPayment,
                EntityKind::RentAgreement,
                Some(id),
                json!({
                    "from": agreement.payment_status,
                    "to": status,
                    "paymentReference": reference,
                }),
            ),
        )
        .await?;
        Ok(AgreementRecord {
            payment_status: status,
            payment_reference: reference,
            updated_at: Utc::now(),
            ..agreement
        })
    }
}
