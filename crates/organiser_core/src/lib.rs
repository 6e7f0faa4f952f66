//! Core domain logic for the organiser: reminders, journeys, notes and
//! settings persisted on-device.
//! This crate owns every persistence and lifecycle invariant; UI layers only
//! call into it.

pub mod clock;
pub mod config;
pub mod db;
pub mod journey;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use journey::controller::{
    EndConfirmation, FinalizedJourney, JourneyController, JourneyError, JourneyPhase,
    LocationTicket, StartOutcome, StartedJourney, UNTITLED_TRIP,
};
pub use journey::location::{
    LocationError, LocationFix, LocationProvider, NoLocation, StaticLocation, UNKNOWN_LOCATION,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::journey::{ActiveJourneyState, Coordinates, Journey, JourneyStatus};
pub use model::note::{Note, UNTITLED_NOTE};
pub use model::settings::{
    Appearance, NotificationSound, Settings, SettingsPatch, ThemePreference,
};
pub use model::task::{Priority, RepeatFrequency, Task};
pub use model::timestamp::{parse_timestamp, Timestamp};
pub use model::validation::ValidationError;
pub use model::{Record, RecordId};
pub use repo::collection::RecordCollection;
pub use repo::views::{JourneyFilter, JourneyQuery, TaskQuery, HOME_PENDING_LIMIT};
pub use service::journey_service::{JourneyDraft, JourneyService};
pub use service::note_service::{NoteDraft, NoteService};
pub use service::settings_service::SettingsStore;
pub use service::task_service::{TaskDraft, TaskService};
pub use store::{
    reset_all, KeyValueStore, MemoryKeyValueStore, Slot, SqliteKeyValueStore, StoreError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
