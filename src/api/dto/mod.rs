//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs derive `Deserialize` (and `Validate` where field rules apply);
//! response DTOs use camelCase field names.

pub mod analytics;
pub mod auth;
pub mod health;
pub mod link;
pub mod pagination;
pub mod redirect;
