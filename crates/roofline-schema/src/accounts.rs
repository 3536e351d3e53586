use sea_orm::entity::prelude::*;

/// Marketplace account. `role` is `user` (seeker) or `owner` (lister); phone and email
/// are unique per role.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub role: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub otp: Option<String>,
    pub otp_expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::properties::Entity")]
    Properties,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
