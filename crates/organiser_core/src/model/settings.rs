//! User preferences singleton.
//!
//! # Invariants
//! - Missing fields in stored data fall back to [`Settings::default`] values.
//! - Theme resolution is a read-time derivation and is never persisted.

use super::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static VOICE_LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Z]{2})?$").expect("valid locale regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationSound {
    #[default]
    #[serde(rename = "Default")]
    Standard,
    Beep,
    Chime,
    Silent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// Concrete appearance, either resolved for display or reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub push_notifications: bool,
    pub notification_sound: NotificationSound,
    /// Minutes before a reminder fires.
    #[serde(rename = "reminderTime")]
    pub reminder_lead_minutes: u32,
    pub theme: ThemePreference,
    pub voice_language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            push_notifications: true,
            notification_sound: NotificationSound::Standard,
            reminder_lead_minutes: 15,
            theme: ThemePreference::System,
            voice_language: "en-US".to_string(),
        }
    }
}

impl Settings {
    /// Overwrites every field present in `patch`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(value) = patch.push_notifications {
            self.push_notifications = value;
        }
        if let Some(value) = patch.notification_sound {
            self.notification_sound = value;
        }
        if let Some(value) = patch.reminder_lead_minutes {
            self.reminder_lead_minutes = value;
        }
        if let Some(value) = patch.theme {
            self.theme = value;
        }
        if let Some(value) = patch.voice_language {
            self.voice_language = value;
        }
    }

    /// Dark for `Dark`, or for `System` under a dark host; light otherwise.
    pub fn resolve_theme(&self, ambient: Appearance) -> Appearance {
        match (self.theme, ambient) {
            (ThemePreference::Dark, _) | (ThemePreference::System, Appearance::Dark) => {
                Appearance::Dark
            }
            _ => Appearance::Light,
        }
    }
}

/// Partial settings change; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub push_notifications: Option<bool>,
    pub notification_sound: Option<NotificationSound>,
    pub reminder_lead_minutes: Option<u32>,
    pub theme: Option<ThemePreference>,
    pub voice_language: Option<String>,
}

impl SettingsPatch {
    pub fn theme(theme: ThemePreference) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    /// Trims the voice language and rejects tags that are not `xx[-YY]`.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if let Some(language) = self.voice_language.take() {
            let trimmed = language.trim();
            if !VOICE_LANGUAGE_RE.is_match(trimmed) {
                return Err(ValidationError::InvalidVoiceLanguage(language));
            }
            self.voice_language = Some(trimmed.to_string());
        }
        Ok(self)
    }
}
