//! API token credentials: bearer extraction and the token service.

pub mod bearer;
pub mod service;

pub use bearer::bearer_token;
pub use service::TokenService;
