pub mod account;
pub mod agreement;
pub mod contact;
pub mod expiry;
pub mod mobile_otp;
pub mod otp;
pub mod property;
pub mod search;
pub mod verification;
pub mod wishlist;
