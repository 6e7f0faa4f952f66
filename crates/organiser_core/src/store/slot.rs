//! Typed JSON slot over one persistence key.

use super::{KeyValueStore, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// Handle to one persisted JSON value.
///
/// Reads fall back to `T::default()`; writes are best effort.
pub struct Slot<'s, T> {
    store: &'s dyn KeyValueStore,
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<'s, T> Slot<'s, T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(store: &'s dyn KeyValueStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            _value: PhantomData,
        }
    }

    /// Returns the stored value, or the default when absent or unreadable.
    pub fn read(&self) -> T {
        self.read_or_else(T::default)
    }

    /// Like [`Slot::read`], with a caller-provided fallback.
    pub fn read_or_else(&self, fallback: impl FnOnce() -> T) -> T {
        let raw = match self.store.get_raw(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback(),
            Err(err) => {
                warn!(
                    "event=slot_read module=store status=error key={} error_code=medium_read_failed error={}",
                    self.key, err
                );
                return fallback();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                // Only the position is logged; the payload may hold user text.
                warn!(
                    "event=slot_read module=store status=error key={} error_code=parse_failed line={} column={}",
                    self.key,
                    err.line(),
                    err.column()
                );
                fallback()
            }
        }
    }

    /// Serializes and stores `value`, dropping the write on failure.
    pub fn write(&self, value: &T) {
        if let Err(err) = self.try_write(value) {
            warn!(
                "event=slot_write module=store status=dropped key={} error={}",
                self.key, err
            );
        }
    }

    /// Serializes and stores `value`, reporting failures to the caller.
    pub fn try_write(&self, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.put_raw(self.key, &raw)?;
        debug!(
            "event=slot_write module=store status=ok key={} bytes={}",
            self.key,
            raw.len()
        );
        Ok(())
    }

    /// Read-modify-write against the latest persisted value.
    pub fn modify<O>(&self, mutate: impl FnOnce(&mut T) -> O) -> O {
        let mut value = self.read();
        let outcome = mutate(&mut value);
        self.write(&value);
        outcome
    }
}
