//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live next to them as
//! separate `New*` structs since ids and timestamps are assigned by the store.
//!
//! - [`User`] - An account that owns links
//! - [`Link`] - A short code mapped to a long URL
//! - [`Click`] - One successful resolution of a link

pub mod click;
pub mod link;
pub mod user;

pub use click::{Click, NewClick};
pub use link::{Link, LinkSummary, NewLink, ResolvedLink};
pub use user::{NewUser, User};
