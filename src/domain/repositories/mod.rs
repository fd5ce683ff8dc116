//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the relational store. Implementations live in
//! `crate::infrastructure::persistence` (PostgreSQL) and
//! `crate::infrastructure::memory` (in-process); mocks are generated with
//! `mockall` for unit tests.
//!
//! - [`UserRepository`] - Accounts and credentials
//! - [`LinkRepository`] - Short links
//! - [`ClickRepository`] - Click log

pub mod click_repository;
pub mod link_repository;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use link_repository::{LinkFilter, LinkRepository};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
