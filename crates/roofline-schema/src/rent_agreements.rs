use sea_orm::entity::prelude::*;

/// Rent-agreement form as submitted. The PDF is rendered from these fields on every
/// download and never stored.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rent_agreements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub creator_id: Uuid,
    pub creator_phone: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_address: String,
    pub tenant_name: String,
    pub tenant_phone: String,
    pub tenant_address: String,
    pub property_address: String,
    pub rent_amount: String,
    pub security_deposit: String,
    pub maintenance: Option<String>,
    pub agreement_duration: String,
    pub rent_start_date: String,
    pub lock_in_period: String,
    pub notice_period: String,
    pub rent_due_day: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub document_generated: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
