//! PostgreSQL adapters.

pub mod account_repository;
pub mod models;
pub mod token_repository;

pub use account_repository::PgAccountRepository;
pub use token_repository::PgRefreshTokenRepository;
