//! # gatehouse-database
//!
//! Repository ports for Gatehouse entities, with two interchangeable
//! backings: PostgreSQL for production and an in-memory implementation
//! with identical observable semantics, used for small deployments and
//! as the test double.

pub mod connection;
pub mod memory;
pub mod password;
pub mod postgres;
pub mod repository;
pub mod schema;

use std::sync::Arc;

use sqlx::PgPool;

pub use connection::DatabasePool;
pub use repository::{SessionRepository, TokenRepository, TrafficMetricRepository, UserDirectory};

/// Bundle of all repository ports wired to one backend.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Session persistence.
    pub sessions: Arc<dyn SessionRepository>,
    /// API token persistence.
    pub tokens: Arc<dyn TokenRepository>,
    /// Traffic metric persistence.
    pub metrics: Arc<dyn TrafficMetricRepository>,
    /// User directory.
    pub users: Arc<dyn UserDirectory>,
}

impl Repositories {
    /// Wire all ports to the in-memory backing.
    pub fn memory() -> Self {
        Self {
            sessions: Arc::new(memory::session::InMemorySessionRepository::new()),
            tokens: Arc::new(memory::token::InMemoryTokenRepository::new()),
            metrics: Arc::new(memory::metric::InMemoryTrafficMetricRepository::new()),
            users: Arc::new(memory::user::InMemoryUserDirectory::new()),
        }
    }

    /// Wire all ports to the PostgreSQL backing.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            sessions: Arc::new(postgres::session::PgSessionRepository::new(pool.clone())),
            tokens: Arc::new(postgres::token::PgTokenRepository::new(pool.clone())),
            metrics: Arc::new(postgres::metric::PgTrafficMetricRepository::new(pool.clone())),
            users: Arc::new(postgres::user::PgUserDirectory::new(pool)),
        }
    }
}
