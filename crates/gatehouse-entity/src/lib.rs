//! # gatehouse-entity
//!
//! Domain entity models for Gatehouse. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! `sqlx::FromRow`.

pub mod auth;
pub mod client;
pub mod metric;
pub mod session;
pub mod token;
pub mod user;
