//! Axum middleware stack.
//!
//! Chain order is a correctness requirement, outermost first: client
//! context, identity extraction, traffic capture, then the per-route
//! enforcement layers. Traffic capture can only attribute identity
//! because extraction runs before it, and enforcement runs after both
//! so that even rejected requests are measured.

pub mod auth;
pub mod client_context;
pub mod cors;
pub mod identity;
pub mod traffic;

pub use auth::{require_admin_api, require_admin_static, require_user_api};
