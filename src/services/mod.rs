// Service exports
pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryGuardianStore;
pub use postgres::{DbLinkStatus, PostgresClient, PostgresError};
pub use repository::GuardianLinkRepository;
