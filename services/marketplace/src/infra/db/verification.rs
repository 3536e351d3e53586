use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionError, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use roofline_core::sea_ext::is_unique_violation;
use roofline_domain::geo::GeoPoint;
use roofline_domain::verification::{PaymentStatus, PropertyVerificationStatus, RequestStatus};
use roofline_schema::{properties, verification_requests};

use crate::domain::repository::VerificationRepository;
use crate::domain::types::{CaptureLocation, VerificationRequest};
use crate::error::MarketplaceError;

#[derive(Clone)]
pub struct DbVerificationRepository {
    pub db: DatabaseConnection,
}

impl VerificationRepository for DbVerificationRepository {
    async fn find_in_flight(
        &self,
        property_id: Uuid,
    ) -> Result<Option<VerificationRequest>, MarketplaceError> {
        let model = verification_requests::Entity::find()
            .filter(verification_requests::Column::PropertyId.eq(property_id))
            .filter(
                verification_requests::Column::Status
                    .is_in(RequestStatus::IN_FLIGHT.map(RequestStatus::as_str)),
            )
            .one(&self.db)
            .await
            .context("find in-flight verification request")?;
        Ok(model.map(request_from_model).transpose()?)
    }

    async fn create(&self, request: &VerificationRequest) -> Result<(), MarketplaceError> {
        let am = verification_requests::ActiveModel {
            id: Set(request.id),
            property_id: Set(request.property_id),
            owner_id: Set(request.owner_id),
            status: Set(request.status.as_str().to_owned()),
            payment_status: Set(request.payment_status.as_str().to_owned()),
            amount: Set(request.amount),
            payment_reference: Set(request.payment_reference.clone()),
            latitude: Set(request.location.map(|p| p.lat)),
            longitude: Set(request.location.map(|p| p.lon)),
            captured_address: Set(request.captured_address.clone()),
            photo_keys: Set(serde_json::json!(request.photo_keys)),
            assigned_to: Set(request.assigned_to),
            reviewed_by: Set(request.reviewed_by),
            review_notes: Set(request.review_notes.clone()),
            valid_from: Set(request.valid_from),
            valid_until: Set(request.valid_until),
            created_at: Set(request.created_at),
            updated_at: Set(request.updated_at),
        };
        match am.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(MarketplaceError::VerificationInFlight),
            Err(e) => Err(anyhow::Error::new(e)
                .context("insert verification request")
                .into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationRequest>, MarketplaceError> {
        let model = verification_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find verification request by id")?;
        Ok(model.map(request_from_model).transpose()?)
    }

    async fn complete_payment(
        &self,
        id: Uuid,
        reference: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        let result = verification_requests::Entity::update_many()
            .filter(verification_requests::Column::Id.eq(id))
            .filter(
                verification_requests::Column::PaymentStatus
                    .ne(PaymentStatus::Completed.as_str()),
            )
            .col_expr(
                verification_requests::Column::PaymentStatus,
                Expr::value(PaymentStatus::Completed.as_str()),
            )
            .col_expr(
                verification_requests::Column::Status,
                Expr::value(RequestStatus::PaymentCompleted.as_str()),
            )
            .col_expr(
                verification_requests::Column::PaymentReference,
                Expr::value(reference.map(str::to_owned)),
            )
            .col_expr(verification_requests::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("complete verification payment")?;
        if result.rows_affected == 0 {
            return Err(MarketplaceError::PaymentAlreadyCompleted);
        }
        Ok(())
    }

    async fn capture_location(&self, capture: &CaptureLocation) -> Result<(), MarketplaceError> {
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                let capture = capture.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let updated = verification_requests::Entity::update_many()
                        .filter(verification_requests::Column::Id.eq(capture.request_id))
                        .filter(
                            verification_requests::Column::Status
                                .eq(RequestStatus::PaymentCompleted.as_str()),
                        )
                        .col_expr(
                            verification_requests::Column::Latitude,
                            Expr::value(capture.location.lat),
                        )
                        .col_expr(
                            verification_requests::Column::Longitude,
                            Expr::value(capture.location.lon),
                        )
                        .col_expr(
                            verification_requests::Column::CapturedAddress,
                            Expr::value(capture.captured_address),
                        )
                        .col_expr(
                            verification_requests::Column::PhotoKeys,
                            Expr::value(serde_json::json!(capture.photo_keys)),
                        )
                        .col_expr(
                            verification_requests::Column::Status,
                            Expr::value(RequestStatus::UnderReview.as_str()),
                        )
                        .col_expr(verification_requests::Column::UpdatedAt, Expr::value(now))
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Err(DbErr::RecordNotUpdated);
                    }
                    properties::Entity::update_many()
                        .filter(properties::Column::Id.eq(capture.property_id))
                        .col_expr(
                            properties::Column::VerificationStatus,
                            Expr::value(PropertyVerificationStatus::PendingVerification.as_str()),
                        )
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            // Another capture won the race.
            Err(TransactionError::Transaction(DbErr::RecordNotUpdated)) => Err(
                MarketplaceError::InvalidState("location already captured for this request"),
            ),
            Err(e) => Err(anyhow::Error::new(e).context("capture location").into()),
        }
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<VerificationRequest>, MarketplaceError> {
        let models = verification_requests::Entity::find()
            .filter(verification_requests::Column::OwnerId.eq(owner_id))
            .order_by_desc(verification_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list verification requests by owner")?;
        Ok(models
            .into_iter()
            .map(request_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn latest_for_property(
        &self,
        property_id: Uuid,
    ) -> Result<Option<VerificationRequest>, MarketplaceError> {
        let model = verification_requests::Entity::find()
            .filter(verification_requests::Column::PropertyId.eq(property_id))
            .order_by_desc(verification_requests::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find latest verification request")?;
        Ok(model.map(request_from_model).transpose()?)
    }
}

fn request_from_model(model: verification_requests::Model) -> anyhow::Result<VerificationRequest> {
    let status = RequestStatus::parse(&model.status)
        .with_context(|| format!("unknown request status {:?}", model.status))?;
    let payment_status = PaymentStatus::parse(&model.payment_status)
        .with_context(|| format!("unknown payment status {:?}", model.payment_status))?;
    let photo_keys: Vec<String> =
        serde_json::from_value(model.photo_keys).context("decode photo keys")?;
    let location = match (model.latitude, model.longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
        _ => None,
    };
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
