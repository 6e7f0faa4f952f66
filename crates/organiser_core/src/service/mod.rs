//! Use-case services behind the form and list screens.
//!
//! # Responsibility
//! - Validate form input at the boundary, before any store is touched.
//! - Translate editor semantics (create vs. edit, discard on empty) into
//!   collection calls.
//!
//! # Invariants
//! - A rejected save leaves every store unchanged.
//! - Services stay medium-agnostic; they only see `KeyValueStore`.

pub mod journey_service;
pub mod note_service;
pub mod settings_service;
pub mod task_service;
