//! Settings singleton store.

use crate::model::settings::{Appearance, Settings, SettingsPatch};
use crate::model::validation::ValidationError;
use crate::store::{keys, KeyValueStore, Slot};
use log::info;

pub struct SettingsStore<'s> {
    slot: Slot<'s, Settings>,
}

impl<'s> SettingsStore<'s> {
    pub fn new(store: &'s dyn KeyValueStore) -> Self {
        Self {
            slot: Slot::new(store, keys::SETTINGS),
        }
    }

    /// Stored settings, or the defaults on first run.
    pub fn get(&self) -> Settings {
        self.slot.read()
    }

    /// Merges `patch` into the latest stored record and persists it.
    pub fn update(&self, patch: SettingsPatch) -> Result<Settings, ValidationError> {
        let patch = patch.validated()?;
        let merged = self.slot.modify(|settings| {
            settings.apply(patch);
            settings.clone()
        });
        info!("event=settings_update module=service status=ok");
        Ok(merged)
    }

    pub fn reset(&self) -> Settings {
        let defaults = Settings::default();
        self.slot.write(&defaults);
        defaults
    }

    /// Display appearance for the host's current `ambient` appearance.
    pub fn resolve_theme(&self, ambient: Appearance) -> Appearance {
        self.get().resolve_theme(ambient)
    }
}
