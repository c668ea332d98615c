pub mod accounting_repo;
pub mod audit_repo;

pub use accounting_repo::{AccountMovementRow, AccountingRepository};
pub use audit_repo::AuditRepository;
