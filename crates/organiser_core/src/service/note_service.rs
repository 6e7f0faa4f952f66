//! Note editor use-cases.

use crate::clock::Clock;
use crate::model::note::{Note, UNTITLED_NOTE};
use crate::model::RecordId;
use crate::repo::collection::RecordCollection;
use crate::store::KeyValueStore;

/// Editor contents at save time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    /// `Some` when editing an existing note.
    pub id: Option<RecordId>,
    pub title: String,
    pub content: String,
}

pub struct NoteService<'s> {
    notes: RecordCollection<'s, Note>,
    clock: &'s dyn Clock,
}

impl<'s> NoteService<'s> {
    pub fn new(store: &'s dyn KeyValueStore, clock: &'s dyn Clock) -> Self {
        Self {
            notes: RecordCollection::new(store),
            clock,
        }
    }

    /// Saves the editor contents.
    ///
    /// # Contract
    /// - Empty title and empty content discard the draft (`None`).
    /// - A blank title becomes [`UNTITLED_NOTE`].
    /// - Edits keep the note's list position; an unknown id is a no-op.
    pub fn save(&self, draft: NoteDraft) -> Option<Note> {
        if draft.title.is_empty() && draft.content.is_empty() {
            return None;
        }

        let title = match draft.title.trim() {
            "" => UNTITLED_NOTE.to_string(),
            trimmed => trimmed.to_string(),
        };
        let note = Note {
            id: draft.id.clone().unwrap_or_default(),
            title,
            content: draft.content,
            updated_at: self.clock.now(),
        };

        match draft.id {
            Some(id) => self.notes.replace(&id, note),
            None => Some(self.notes.create(note)),
        }
    }

    pub fn delete(&self, id: &str) -> bool {
        self.notes.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Note> {
        self.notes.get(id)
    }

    /// Notes in collection order.
    pub fn list(&self) -> Vec<Note> {
        self.notes.all()
    }
}
