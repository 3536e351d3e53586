use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, sea_query::Expr,
};
use uuid::Uuid;

use roofline_domain::verification::PaymentStatus;
use roofline_schema::rent_agreements;

use crate::domain::repository::AgreementRepository;
use crate::domain::types::RentAgreement;
use crate::error::MarketplaceError;

#[derive(Clone)]
pub struct DbAgreementRepository {
    pub db: DatabaseConnection,
}

impl AgreementRepository for DbAgreementRepository {
    async fn create(&self, agreement: &RentAgreement) -> Result<(), MarketplaceError> {
        let a = agreement.clone();
        rent_agreements::ActiveModel {
            id: Set(a.id),
            creator_id: Set(a.creator_id),
            creator_phone: Set(a.creator_phone),
            owner_name: Set(a.owner_name),
            owner_phone: Set(a.owner_phone),
            owner_address: Set(a.owner_address),
            tenant_name: Set(a.tenant_name),
            tenant_phone: Set(a.tenant_phone),
            tenant_address: Set(a.tenant_address),
            property_address: Set(a.property_address),
            rent_amount: Set(a.rent_amount),
            security_deposit: Set(a.security_deposit),
            maintenance: Set(a.maintenance),
            agreement_duration: Set(a.agreement_duration),
            rent_start_date: Set(a.rent_start_date),
            lock_in_period: Set(a.lock_in_period),
            notice_period: Set(a.notice_period),
            rent_due_day: Set(a.rent_due_day),
            payment_status: Set(a.payment_status.as_str().to_owned()),
            payment_reference: Set(a.payment_reference),
            document_generated: Set(a.document_generated),
            created_at: Set(a.created_at),
            updated_at: Set(a.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert rent agreement")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentAgreement>, MarketplaceError> {
        let model = rent_agreements::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find rent agreement by id")?;
        Ok(model.map(agreement_from_model).transpose()?)
    }

    async fn list_for_phone(&self, phone: &str) -> Result<Vec<RentAgreement>, MarketplaceError> {
        let models = rent_agreements::Entity::find()
            .filter(
                Condition::any()
                    .add(rent_agreements::Column::CreatorPhone.eq(phone))
                    .add(rent_agreements::Column::OwnerPhone.eq(phone))
                    .add(rent_agreements::Column::TenantPhone.eq(phone)),
            )
            .order_by_desc(rent_agreements::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list rent agreements for phone")?;
        Ok(models
            .into_iter()
            .map(agreement_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update_payment(
        &self,
        id: Uuid,
        status: PaymentStatus,
        reference: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        let mut update = rent_agreements::Entity::update_many()
            .filter(rent_agreements::Column::Id.eq(id))
            .col_expr(
                rent_agreements::Column::PaymentStatus,
                Expr::value(status.as_str()),
            )
            .col_expr(rent_agreements::Column::UpdatedAt, Expr::value(Utc::now()));
        if let Some(reference) = reference {
            update = update.col_expr(
                rent_agreements::Column::PaymentReference,
                Expr::value(reference),
            );
        }
        update
            .exec(&self.db)
            .await
            .context("update rent agreement payment")?;
        Ok(())
    }

    async fn mark_document_generated(&self, id: Uuid) -> Result<(), MarketplaceError> {
        rent_agreements::Entity::update_many()
            .filter(rent_agreements::Column::Id.eq(id))
            .col_expr(rent_agreements::Column::DocumentGenerated, Expr::value(true))
            .col_expr(rent_agreements::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(&self.db)
            .await
            .context("mark rent agreement document generated")?;
        Ok(())
    }
}

fn agreement_from_model(model: rent_agreements::Model) -> anyhow::Result<RentAgreement> {
    let payment_status = PaymentStatus::parse(&model.payment_status)
        .with_context(|| format!("unknown payment status {:?}", model.payment_status))?;
    Ok(RentAgreement {
        id: model.id,
        creator_id: model.creator_id,
        creator_phone: model.creator_phone,
        owner_name: model.owner_name,
        owner_phone: model.owner_phone,
        owner_address: model.owner_address,
        tenant_name: model.tenant_name,
        tenant_phone: model.tenant_phone,
        tenant_address: model.tenant_address,
        property_address: model.property_address,
        rent_amount: model.rent_amount,
        security_deposit: model.security_deposit,
        maintenance: model.maintenance,
        agreement_duration: model.agreement_duration,
        rent_start_date: model.rent_start_date,
        lock_in_period: model.lock_in_period,
        notice_period: model.notice_period,
        rent_due_day: model.rent_due_day,
        payment_status,
        payment_reference: model.payment_reference,
        document_generated: model.document_generated,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
