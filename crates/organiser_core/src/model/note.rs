//! Free-text note record.

use super::timestamp::{self, Timestamp};
use super::{Record, RecordId};
use crate::store::keys;
use serde::{Deserialize, Serialize};

/// Title used when a note is saved with a blank title.
pub const UNTITLED_NOTE: &str = "Untitled Note";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(with = "timestamp::required")]
    pub updated_at: Timestamp,
}

impl Record for Note {
    const KEY: &'static str = keys::NOTES;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
