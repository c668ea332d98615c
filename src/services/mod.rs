pub mod accounting_service;
pub mod posting_service;

pub use accounting_service::AccountingService;
pub use posting_service::DerivedPostingService;
