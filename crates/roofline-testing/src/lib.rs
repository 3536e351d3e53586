//! Test utilities for Roofline services.
//!
//! Provides `MockAuth` (real bearer tokens for a chosen identity), `FakeStorage` and the
//! JSON fixture loader. Import from tests only.

pub mod auth;
pub mod fixture;
pub mod storage;
