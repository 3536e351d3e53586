use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use roofline_schema::temp_mobile_verifications;

use super::outbox::insert_outbox_event;
use crate::domain::repository::MobileVerificationRepository;
use crate::domain::types::{MobileVerification, OutboxEvent};
use crate::error::MarketplaceError;

#[derive(Clone)]
pub struct DbMobileVerificationRepository {
    pub db: DatabaseConnection,
}

impl MobileVerificationRepository for DbMobileVerificationRepository {
    async fn upsert_with_outbox(
        &self,
        record: &MobileVerification,
        event: &OutboxEvent,
    ) -> Result<(), MarketplaceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let record = record.clone();
                let event = event.clone();
                Box::pin(async move {
                    let am = temp_mobile_verifications::ActiveModel {
                        id: Set(record.id),
                        mobile: Set(record.mobile),
                        otp: Set(record.otp),
                        expires_at: Set(record.expires_at),
                        verified: Set(record.verified),
                        created_at: Set(record.created_at),
                        updated_at: Set(record.updated_at),
                    };
                    // A resend overwrites the OTP and drops any earlier verification.
                    temp_mobile_verifications::Entity::insert(am)
                        .on_conflict(
                            OnConflict::column(temp_mobile_verifications::Column::Mobile)
                                .update_columns([
                                    temp_mobile_verifications::Column::Otp,
                                    temp_mobile_verifications::Column::ExpiresAt,
                                    temp_mobile_verifications::Column::Verified,
                                    temp_mobile_verifications::Column::UpdatedAt,
                                ])
                                .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    insert_outbox_event(txn, &event).await
                })
            })
            .await
            .context("upsert mobile verification")?;
        Ok(())
    }

    async fn find_by_mobile(
        &self,
        mobile: &str,
    ) -> Result<Option<MobileVerification>, MarketplaceError> {
        let model = temp_mobile_verifications::Entity::find()
            .filter(temp_mobile_verifications::Column::Mobile.eq(mobile))
            .one(&self.db)
            .await
            .context("find mobile verification")?;
        Ok(model.map(|m| MobileVerification {
            id: m.id,
            mobile: m.mobile,
            otp: m.otp,
            expires_at: m.expires_at,
            verified: m.verified,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }))
    }

    async fn mark_verified(&self, mobile: &str) -> Result<(), MarketplaceError> {
        temp_mobile_verifications::Entity::update_many()
            .filter(temp_mobile_verifications::Column::Mobile.eq(mobile))
            .col_expr(temp_mobile_verifications::Column::Verified, Expr::value(true))
            .col_expr(
                temp_mobile_verifications::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .exec(&self.db)
            .await
            .context("mark mobile verified")?;
        Ok(())
    }
}
