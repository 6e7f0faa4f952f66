//! Live journey tracking.
//!
//! # Responsibility
//! - Own the Idle/Active lifecycle backed by the `active_journey` slot.
//! - Turn one finished tracking session into exactly one completed journey.
//! - Degrade to the "Unknown Location" sentinel whenever positioning fails.
//!
//! # Invariants
//! - At most one location request is outstanding; a superseded request's
//!   result is discarded.
//! - Leaving `Active` always persists the cleared buffer.

pub mod controller;
pub mod distance;
pub mod location;
