//! # gatehouse-api
//!
//! HTTP layer for Gatehouse built on Axum.
//!
//! Provides the ordered middleware chain (client context, identity
//! extraction, traffic capture, route enforcement), REST endpoints for
//! sessions and API tokens, the management UI shells, extractors, DTOs,
//! and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
