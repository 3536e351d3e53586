mod account;
mod activity;
mod admin;
mod agreement;
mod dashboard;
mod expiry;
mod property;
mod verification;

pub use account::DbAccountAdminRepository;
pub use activity::DbActivityLogRepository;
pub use admin::DbAdminRepository;
pub use agreement::DbAgreementAdminRepository;
pub use dashboard::DbDashboardRepository;
pub use expiry::DbExpirySweeper;
pub use property::DbPropertyAdminRepository;
pub use verification::DbVerificationAdminRepository;
