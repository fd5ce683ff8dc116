//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts and credentials
//! - [`PgLinkRepository`] - Link storage, lookup and listing
//! - [`PgClickRepository`] - Click log

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_user_repository::PgUserRepository;
