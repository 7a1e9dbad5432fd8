//! Admin handlers.

pub mod sessions;
pub mod traffic;
