use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use uuid::Uuid;

use roofline_domain::pagination::PageRequest;
use roofline_domain::verification::PaymentStatus;
use roofline_schema::rent_agreements;

use crate::domain::repository::AgreementAdminRepository;
use crate::domain::types::{AgreementFilter, AgreementRecord};
use crate::error::AdminError;

#[derive(Clone)]
pub struct DbAgreementAdminRepository {
    pub db: DatabaseConnection,
}

impl AgreementAdminRepository for DbAgreementAdminRepository {
    async fn list(
        &self,
        filter: &AgreementFilter,
        page: PageRequest,
    ) -> Result<Vec<AgreementRecord>, AdminError> {
        let mut query = rent_agreements::Entity::find();
        if let Some(status) = filter.payment_status {
            query = query.filter(rent_agreements::Column::PaymentStatus.eq(status.as_str()));
        }
        if let Some(phone) = &filter.phone {
            query = query.filter(
                Condition::any()
                    .add(rent_agreements::Column::CreatorPhone.eq(phone.as_str()))
                    .add(rent_agreements::Column::OwnerPhone.eq(phone.as_str()))
                    .add(rent_agreements::Column::TenantPhone.eq(phone.as_str())),
            );
        }
        let models = query
            .order_by_desc(rent_agreements::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list rent agreements")?;
        Ok(models
            .into_iter()
            .map(record_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AgreementRecord>, AdminError> {
        let model = rent_agreements::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find rent agreement")?;
        Ok(model.map(record_from_model).transpose()?)
    }

    async fn set_payment(
        &self,
        id: Uuid,
        status: PaymentStatus,
        reference: Option<&str>,
    ) -> Result<(), AdminError> {
        rent_agreements::Entity::update_many()
            .filter(rent_agreements::Column::Id.eq(id))
            .col_expr(
                rent_agreements::Column::PaymentStatus,
                Expr::value(status.as_str()),
            )
            .col_expr(
                rent_agreements::Column::PaymentReference,
                Expr::value(reference.map(str::to_owned)),
            )
            .col_expr(rent_agreements::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("set agreement payment status")?;
        Ok(())
    }
}

fn record_from_model(model: rent_agreements::Model) -> anyhow::Result<AgreementRecord> {
    let payment_status = PaymentStatus::parse(&model.payment_status)
        .with_context(|| format!("unknown payment status {:?}", model.payment_status))?;
    Ok(AgreementRecord {
        id: model.id,
        creator_id: model.creator_id,
        creator_phone: model.creator_phone,
        owner_name: model.owner_name,
        owner_phone: model.owner_phone,
        tenant_name: model.tenant_name,
        tenant_phone: model.tenant_phone,
        property_address: model.property_address,
        rent_amount: model.rent_amount,
        agreement_duration: model.agreement_duration,
        rent_start_date: model.rent_start_date,
        payment_status,
        payment_reference: model.payment_reference,
        document_generated: model.document_generated,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
