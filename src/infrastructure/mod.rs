//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-process repository implementations

pub mod cache;
pub mod memory;
pub mod persistence;

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::repositories::{ClickRepository, LinkRepository, UserRepository};
use memory::MemoryStore;
use persistence::{PgClickRepository, PgLinkRepository, PgUserRepository};

/// The set of repositories a running application works against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool)),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            links: Arc::new(store.clone()),
            clicks: Arc::new(store),
        }
    }
}
