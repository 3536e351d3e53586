//! sea-orm entities for the shared Roofline database.

pub mod accounts;
pub mod admin_activity_logs;
pub mod admins;
pub mod contacts;
pub mod employee_permissions;
pub mod outbox_events;
pub mod properties;
pub mod property_verifications;
pub mod rent_agreements;
pub mod temp_mobile_verifications;
pub mod verification_requests;
pub mod wishlists;
