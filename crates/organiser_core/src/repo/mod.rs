//! Record collections layered on the persistent store.
//!
//! # Responsibility
//! - Provide create/update/remove/list over one ordered, id-keyed slot.
//! - Provide the derived task and journey views consumed by list screens.
//!
//! # Invariants
//! - New records are prepended; updates keep their position.
//! - Lookup misses are no-ops, never errors.
//! - Derived views never write back to storage.

pub mod collection;
pub mod views;
