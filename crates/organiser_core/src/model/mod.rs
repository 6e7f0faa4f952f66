//! Domain records persisted by the organiser core.
//!
//! # Responsibility
//! - Define the JSON-shaped records stored in each slot.
//! - Close every string union (priority, status, theme, ...) into an enum.
//!
//! # Invariants
//! - Record ids are opaque strings, unique per collection, never reassigned.
//! - Field names serialize in camelCase to stay readable by older data.

pub mod journey;
pub mod note;
pub mod settings;
pub mod task;
pub mod timestamp;
pub mod validation;

use uuid::Uuid;

/// Opaque record identifier. Fresh ids are UUID v4 strings, but any
/// non-blank string read from storage is accepted.
pub type RecordId = String;

/// Generates a fresh random record id.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4().to_string()
}

/// A record kept in one of the id-keyed collections.
pub trait Record: serde::Serialize + serde::de::DeserializeOwned + Clone {
    /// Persistence key of the collection holding this record type.
    const KEY: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: RecordId);
}
