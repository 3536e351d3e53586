mod account;
mod agreement;
mod contact;
mod mobile;
mod outbox;
mod property;
mod verification;
mod wishlist;

pub use account::DbAccountRepository;
pub use agreement::DbAgreementRepository;
pub use contact::DbContactRepository;
pub use mobile::DbMobileVerificationRepository;
pub use property::DbPropertyRepository;
pub use verification::DbVerificationRepository;
pub use wishlist::DbWishlistRepository;
