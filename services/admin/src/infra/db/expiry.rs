use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use roofline_domain::verification::{PropertyVerificationStatus, RequestStatus};
use roofline_schema::{properties, property_verifications, verification_requests};

use crate::domain::repository::ExpirySweeper;
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbExpirySweeper {
    pub db: DatabaseConnection,
}

impl ExpirySweeper for DbExpirySweeper {
    async fn expire_lapsed(&self, now: DateTime<Utc>) -> Result<u64, AdminError> {
        let flipped = self
            .db
            .transaction::<_, u64, DbErr>(move |txn| {
                Box::pin(async move {
                    let lapsed: Vec<Uuid> = properties::Entity::find()
                        .select_only()
                        .column(properties::Column::Id)
                        .filter(properties::Column::IsVerified.eq(true))
                        .filter(properties::Column::VerificationExpiry.lt(now))
                        .lock_exclusive()
                        .into_tuple()
                        .all(txn)
                        .await?;
                    if lapsed.is_empty() {
                        return Ok(0);
                    }

                    let result = properties::Entity::update_many()
                        .filter(properties::Column::Id.is_in(lapsed.clone()))
                        .col_expr(properties::Column::IsVerified, Expr::value(false))
                        .col_expr(
                            properties::Column::VerificationStatus,
                            Expr::value(PropertyVerificationStatus::Expired.as_str()),
                        )
                        .exec(txn)
                        .await?;
                    property_verifications::Entity::update_many()
                        .filter(property_verifications::Column::PropertyId.is_in(lapsed.clone()))
                        .filter(property_verifications::Column::IsActive.eq(true))
                        .col_expr(property_verifications::Column::IsActive, Expr::value(false))
                        .exec(txn)
                        .await?;
                    verification_requests::Entity::update_many()
                        .filter(verification_requests::Column::PropertyId.is_in(lapsed))
                        .filter(
                            verification_requests::Column::Status
                                .eq(RequestStatus::Approved.as_str()),
                        )
                        .filter(verification_requests::Column::ValidUntil.lt(now))
                        .col_expr(
                            verification_requests::Column::Status,
                            Expr::value(RequestStatus::Expired.as_str()),
                        )
                        .col_expr(verification_requests::Column::UpdatedAt, Expr::value(now))
                        .exec(txn)
                        .await?;
                    Ok(result.rows_affected)
                })
            })
            .await
            .context("expire lapsed verifications")?;
        Ok(flipped)
    }
}
