//! PostgreSQL repository backings.

pub mod metric;
pub mod session;
pub mod token;
pub mod user;
