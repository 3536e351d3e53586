//! Auth types shared across Roofline services.
//!
//! Provides JWT issue/validation, the bearer-token identity extractors for marketplace
//! accounts and admin staff, and password hashing.

pub mod identity;
pub mod password;
pub mod token;
