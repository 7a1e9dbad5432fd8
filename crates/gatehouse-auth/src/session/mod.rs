//! Session lifecycle: cookie handling, store operations, expiry sweep.

pub mod cleanup;
pub mod cookie;
pub mod store;

pub use cleanup::SessionCleanup;
pub use store::SessionStore;
