pub mod access;
pub mod account;
pub mod activity;
pub mod agreement;
pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod expiry;
pub mod property;
pub mod verification;
