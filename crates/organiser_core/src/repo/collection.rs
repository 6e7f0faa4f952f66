//! Generic ordered record collection.

use crate::model::{new_record_id, Record, RecordId};
use crate::store::{KeyValueStore, Slot};
use log::debug;
use std::cmp::Ordering;

/// CRUD layer over the slot `R::KEY`, most-recent-insert first.
pub struct RecordCollection<'s, R> {
    slot: Slot<'s, Vec<R>>,
}

impl<'s, R: Record> RecordCollection<'s, R> {
    pub fn new(store: &'s dyn KeyValueStore) -> Self {
        Self {
            slot: Slot::new(store, R::KEY),
        }
    }

    /// Prepends `record`, assigning a fresh id when its id is blank.
    ///
    /// Id collisions are not checked.
    pub fn create(&self, mut record: R) -> R {
        if record.id().trim().is_empty() {
            record.set_id(new_record_id());
        }
        let stored = record.clone();
        self.slot.modify(|records| records.insert(0, record));
        debug!(
            "event=record_create module=repo status=ok key={}",
            R::KEY
        );
        stored
    }

    /// Applies `mutate` to the record with `id`, keeping its position.
    ///
    /// The id is restored if the mutator changed it. Returns the updated
    /// record, or `None` (without writing) when no record matched.
    pub fn update(&self, id: &str, mutate: impl FnOnce(&mut R)) -> Option<R> {
        let mut records = self.slot.read();
        let record = records.iter_mut().find(|record| record.id() == id)?;
        let original_id: RecordId = record.id().to_string();
        mutate(record);
        record.set_id(original_id);
        let updated = record.clone();
        self.slot.write(&records);
        debug!(
            "event=record_update module=repo status=ok key={}",
            R::KEY
        );
        Some(updated)
    }

    /// Replaces the record with `id` by `replacement` (id preserved).
    pub fn replace(&self, id: &str, replacement: R) -> Option<R> {
        self.update(id, move |record| *record = replacement)
    }

    /// Removes the record with `id`. Returns whether one was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut records = self.slot.read();
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return false;
        }
        self.slot.write(&records);
        debug!(
            "event=record_remove module=repo status=ok key={}",
            R::KEY
        );
        true
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.slot.read().into_iter().find(|record| record.id() == id)
    }

    /// All records in stored order.
    pub fn all(&self) -> Vec<R> {
        self.slot.read()
    }

    /// Records matching `filter`, in stored order.
    pub fn list(&self, filter: impl FnMut(&R) -> bool) -> Vec<R> {
        let mut filter = filter;
        self.slot
            .read()
            .into_iter()
            .filter(|record| filter(record))
            .collect()
    }

    /// Records matching `filter`, stably sorted by `order`.
    pub fn list_sorted(
        &self,
        filter: impl FnMut(&R) -> bool,
        order: impl FnMut(&R, &R) -> Ordering,
    ) -> Vec<R> {
        let mut records = self.list(filter);
        records.sort_by(order);
        records
    }

    pub fn len(&self) -> usize {
        self.slot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
