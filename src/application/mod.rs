//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution and listing
//! - [`services::analytics_service::AnalyticsService`] - Per-link click analytics
//! - [`services::auth_service::AuthService`] - Password login and bearer tokens

pub mod services;
