use sea_orm_migration::prelude::*;

mod m20260901_000001_create_accounts;
mod m20260901_000002_create_temp_mobile_verifications;
mod m20260901_000003_create_properties;
mod m20260901_000004_create_verification_requests;
mod m20260901_000005_create_property_verifications;
mod m20260901_000006_create_contacts;
mod m20260901_000007_create_wishlists;
mod m20260901_000008_create_rent_agreements;
mod m20260901_000009_create_admins;
mod m20260901_000010_create_admin_activity_logs;
mod m20260901_000011_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_accounts::Migration),
            Box::new(m20260901_000002_create_temp_mobile_verifications::Migration),
            Box::new(m20260901_000003_create_properties::Migration),
            Box::new(m20260901_000004_create_verification_requests::Migration),
            Box::new(m20260901_000005_create_property_verifications::Migration),
            Box::new(m20260901_000006_create_contacts::Migration),
            Box::new(m20260901_000007_create_wishlists::Migration),
            Box::new(m20260901_000008_create_rent_agreements::Migration),
            Box::new(m20260901_000009_create_admins::Migration),
            Box::new(m20260901_000010_create_admin_activity_logs::Migration),
            Box::new(m20260901_000011_create_outbox_events::Migration),
        ]
    }
}
