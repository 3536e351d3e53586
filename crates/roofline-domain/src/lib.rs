//! Domain types shared across all Roofline services.
//!
//! This crate contains only pure types and rules with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod account;
pub mod agreement;
pub mod geo;
pub mod listing;
pub mod pagination;
pub mod verification;
