use sea_orm::entity::prelude::*;

/// Owner-initiated verification of one property.
///
/// At most one row per property may hold a non-terminal status; a partial unique index
/// enforces it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "verification_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub property_id: Uuid,
    pub owner_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub amount: i32,
    pub payment_reference: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub captured_address: Option<String>,
    /// JSON array of object keys under `verification/{id}/`.
    pub photo_keys: Json,
    pub assigned_to: Option<Uuid>,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
    pub valid_from: Option<chrono::DateTime<chrono::Utc>>,
    pub valid_until: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id"
    )]
    Property,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
