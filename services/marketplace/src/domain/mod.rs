pub mod agreement_template;
pub mod repository;
pub mod types;
