//! In-memory repository backings.
//!
//! Each store guards a single map with one `std::sync::RwLock` and never
//! awaits while holding a guard. Observable semantics match the
//! PostgreSQL backings, which also makes these stores the test doubles
//! for the whole crate graph.

pub mod metric;
pub mod session;
pub mod token;
pub mod user;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Acquire a read guard, recovering from poisoning.
pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Acquire a write guard, recovering from poisoning.
pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
