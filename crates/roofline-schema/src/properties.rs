use sea_orm::entity::prelude::*;

/// A listing. Money fields are stored exactly as submitted.
///
/// `updated_at` drives the edit cooldown and is not touched by availability toggles.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub listing_type: String,
    pub property_type: String,
    pub title: String,
    pub description: Option<String>,
    pub bhk: Option<String>,
    pub furnishing: Option<String>,
    pub city: String,
    pub locality: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub contact_number: String,
    pub rent: Option<String>,
    pub security_deposit: Option<String>,
    pub maintenance: Option<String>,
    pub sale_price: Option<String>,
    pub is_draft: bool,
    pub is_available: bool,
    pub is_verified: bool,
    pub verification_status: String,
    pub verification_expiry: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::OwnerId",
        to = "super::accounts::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::verification_requests::Entity")]
    VerificationRequests,
    #[sea_orm(has_many = "super::contacts::Entity")]
    Contacts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::verification_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerificationRequests.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
