//! # gatehouse-auth
//!
//! Session lifecycle, API token service, credential resolution, and
//! client identification for the Gatehouse gateway.
//!
//! ## Modules
//!
//! - `session`: cookie handling, session store, expired-session sweep
//! - `token`: bearer credential extraction and the token service
//! - `client`: ClientInfo extraction, UA parsing, fingerprint cache
//! - `resolver`: cookie-first credential resolution

pub mod client;
pub mod resolver;
pub mod session;
pub mod token;

pub use client::{ClientInfoExtractor, FingerprintCache, GeoResolver, NoGeoResolver};
pub use resolver::AuthResolver;
pub use session::{SessionCleanup, SessionStore};
pub use token::TokenService;
