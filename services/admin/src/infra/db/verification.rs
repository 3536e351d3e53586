use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use roofline_domain::geo::GeoPoint;
use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::{PaymentStatus, PropertyVerificationStatus, RequestStatus};
use roofline_schema::{properties, property_verifications, verification_requests};

use crate::domain::repository::VerificationAdminRepository;
use crate::domain::types::{
    Approval, Rejection, RequestStatusCounts, VerificationRequest, VerificationScope,
};
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbVerificationAdminRepository {
    pub db: DatabaseConnection,
}

fn scope_condition(scope: VerificationScope) -> Condition {
    match scope {
        VerificationScope::All => Condition::all(),
        VerificationScope::VisibleTo(admin_id) => Condition::any()
            .add(verification_requests::Column::AssignedTo.is_null())
            .add(verification_requests::Column::AssignedTo.eq(admin_id)),
    }
}

fn in_flight_statuses() -> Vec<&'static str> {
    RequestStatus::IN_FLIGHT.iter().map(|s| s.as_str()).collect()
}

impl VerificationAdminRepository for DbVerificationAdminRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationRequest>, AdminError> {
        let model = verification_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find verification request")?;
        Ok(model.map(request_from_model).transpose()?)
    }

    async fn list(
        &self,
        scope: VerificationScope,
        status: Option<RequestStatus>,
        page: PageRequest,
    ) -> Result<Vec<VerificationRequest>, AdminError> {
        let mut query = verification_requests::Entity::find().filter(scope_condition(scope));
        if let Some(status) = status {
            query = query.filter(verification_requests::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(verification_requests::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list verification requests")?;
        Ok(models
            .into_iter()
            .map(request_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn count_by_status(
        &self,
        scope: VerificationScope,
    ) -> Result<RequestStatusCounts, AdminError> {
        let rows: Vec<(String, i64)> = verification_requests::Entity::find()
            .select_only()
            .column(verification_requests::Column::Status)
            .column_as(Expr::col(verification_requests::Column::Id).count(), "count")
            .filter(scope_condition(scope))
            .group_by(verification_requests::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count verification requests by status")?;
        let mut counts = RequestStatusCounts::default();
        for (status, count) in rows {
            let status = RequestStatus::parse(&status)
                .with_context(|| format!("unknown request status {status:?}"))?;
            counts.add(status, count.max(0) as u64);
        }
        Ok(counts)
    }

    async fn assign(&self, id: Uuid, admin_id: Uuid) -> Result<bool, AdminError> {
        let result = verification_requests::Entity::update_many()
            .filter(verification_requests::Column::Id.eq(id))
            .filter(verification_requests::Column::Status.is_in(in_flight_statuses()))
            .col_expr(verification_requests::Column::AssignedTo, Expr::value(admin_id))
            .col_expr(
                verification_requests::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .exec(&self.db)
            .await
            .context("assign verification request")?;
        Ok(result.rows_affected > 0)
    }

    async fn approve(&self, approval: &Approval) -> Result<bool, AdminError> {
        let approval = approval.clone();
        let applied = self
            .db
            .transaction::<_, bool, DbErr>(move |txn| {
                Box::pin(async move {
                    let updated = verification_requests::Entity::update_many()
                        .filter(verification_requests::Column::Id.eq(approval.request_id))
                        .filter(
                            verification_requests::Column::Status
                                .eq(RequestStatus::UnderReview.as_str()),
                        )
                        .col_expr(
                            verification_requests::Column::Status,
                            Expr::value(RequestStatus::Approved.as_str()),
                        )
                        .col_expr(
                            verification_requests::Column::ReviewedBy,
                            Expr::value(approval.reviewer_id),
                        )
                        .col_expr(
                            verification_requests::Column::ReviewNotes,
                            Expr::value(approval.notes.clone()),
                        )
                        .col_expr(
                            verification_requests::Column::ValidFrom,
                            Expr::value(approval.valid_from),
                        )
                        .col_expr(
                            verification_requests::Column::ValidUntil,
                            Expr::value(approval.valid_until),
                        )
                        .col_expr(
                            verification_requests::Column::UpdatedAt,
                            Expr::value(approval.valid_from),
                        )
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Ok(false);
                    }

                    properties::Entity::update_many()
                        .filter(properties::Column::Id.eq(approval.property_id))
                        .col_expr(properties::Column::IsVerified, Expr::value(true))
                        .col_expr(
                            properties::Column::VerificationStatus,
                            Expr::value(PropertyVerificationStatus::Verified.as_str()),
                        )
                        .col_expr(
                            properties::Column::VerificationExpiry,
                            Expr::value(approval.valid_until),
                        )
                        .exec(txn)
                        .await?;

                    property_verifications::Entity::update_many()
                        .filter(property_verifications::Column::PropertyId.eq(approval.property_id))
                        .filter(property_verifications::Column::IsActive.eq(true))
                        .col_expr(property_verifications::Column::IsActive, Expr::value(false))
                        .exec(txn)
                        .await?;

                    property_verifications::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        property_id: Set(approval.property_id),
                        request_id: Set(approval.request_id),
                        verified_by: Set(approval.reviewer_id),
                        valid_until: Set(approval.valid_until),
                        is_active: Set(true),
                        created_at: Set(approval.valid_from),
                    }
                    .insert(txn)
                    .await?;
                    Ok(true)
                })
            })
            .await
            .context("approve verification request")?;
        Ok(applied)
    }

    async fn reject(&self, rejection: &Rejection) -> Result<bool, AdminError> {
        let rejection = rejection.clone();
        let applied = self
            .db
            .transaction::<_, bool, DbErr>(move |txn| {
                Box::pin(async move {
                    let updated = verification_requests::Entity::update_many()
                        .filter(verification_requests::Column::Id.eq(rejection.request_id))
                        .filter(
                            verification_requests::Column::Status
                                .eq(RequestStatus::UnderReview.as_str()),
                        )
                        .col_expr(
                            verification_requests::Column::Status,
                            Expr::value(RequestStatus::Rejected.as_str()),
                        )
                        .col_expr(
                            verification_requests::Column::ReviewedBy,
                            Expr::value(rejection.reviewer_id),
                        )
                        .col_expr(
                            verification_requests::Column::ReviewNotes,
                            Expr::value(rejection.notes.clone()),
                        )
                        .col_expr(
                            verification_requests::Column::UpdatedAt,
                            Expr::value(rejection.reviewed_at),
                        )
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Ok(false);
                    }

                    properties::Entity::update_many()
                        .filter(properties::Column::Id.eq(rejection.property_id))
                        .col_expr(properties::Column::IsVerified, Expr::value(false))
                        .col_expr(
                            properties::Column::VerificationStatus,
                            Expr::value(PropertyVerificationStatus::NotVerified.as_str()),
                        )
                        .col_expr(
                            properties::Column::VerificationExpiry,
                            Expr::value(Option::<chrono::DateTime<chrono::Utc>>::None),
                        )
                        .exec(txn)
                        .await?;

                    property_verifications::Entity::update_many()
                        .filter(
                            property_verifications::Column::PropertyId.eq(rejection.property_id),
                        )
                        .filter(property_verifications::Column::IsActive.eq(true))
                        .col_expr(property_verifications::Column::IsActive, Expr::value(false))
                        .exec(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("reject verification request")?;
        Ok(applied)
    }
}

fn request_from_model(model: verification_requests::Model) -> anyhow::Result<VerificationRequest> {
    let status = RequestStatus::parse(&model.status)
        .with_context(|| format!("unknown request status {:?}", model.status))?;
    let payment_status = PaymentStatus::parse(&model.payment_status)
        .with_context(|| format!("unknown payment status {:?}", model.payment_status))?;
    let photo_keys: Vec<String> =
        serde_json::from_value(model.photo_keys).context("decode photo keys")?;
    let location = model
        .latitude
        .zip(model.longitude)
        .map(|(lat, lon)| GeoPoint::new(lat, lon));
    Ok(VerificationRequest {
        id: model.id,
        property_id: model.property_id,
        owner_id: model.owner_id,
        status,
        payment_status,
        amount: model.amount,
        payment_reference: model.payment_reference,
        location,
        captured_address: model.captured_address,
        photo_keys,
        assigned_to: model.assigned_to,
        reviewed_by: model.reviewed_by,
        review_notes: model.review_notes,
        valid_from: model.valid_from,
        valid_until: model.valid_until,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
