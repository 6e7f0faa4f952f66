//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the organiser use-cases to Dart via FRB as flat, sync calls.
//! - Map core types to string/number DTOs the generated bindings can carry.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens its own connection; nothing is cached but the DB path.
//! - Date-times cross the boundary as strings: RFC 3339 out, RFC 3339 or
//!   `YYYY-MM-DDTHH:MM[:SS]` in.
//! - Positions are resolved on the Dart side; a call without coordinates
//!   records the journey with the unknown-location sentinel.

use organiser_core::db::open_db;
use organiser_core::model::timestamp::format_timestamp;
use organiser_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_timestamp,
    reset_all, ActiveJourneyState, Appearance, Coordinates, CoreConfig, Journey, JourneyController,
    JourneyFilter, JourneyQuery, JourneyService, JourneyStatus, KeyValueStore, LocationError,
    LocationFix, Note, NoteDraft, NoteService, NotificationSound, Priority, RepeatFrequency,
    Settings, SettingsPatch, SettingsStore, SqliteKeyValueStore, StartOutcome, SystemClock, Task,
    TaskDraft, TaskQuery, TaskService, ThemePreference, ValidationError, HOME_PENDING_LIMIT,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// ID of the created or touched record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// RFC 3339.
    pub scheduled_at: String,
    pub completed: bool,
    /// `High|Medium|Low`.
    pub priority: String,
    /// `None|Daily|WorkDays|Weekends|Weekly|Monthly`.
    pub repeat: String,
    pub important: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JourneyItem {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub start_location: String,
    pub end_location: Option<String>,
    pub planned_destination: Option<String>,
    pub distance_km: f64,
    /// `upcoming|in-progress|completed`.
    pub status: String,
    pub is_auto: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JourneyListResponse {
    pub items: Vec<JourneyItem>,
    pub message: String,
}

/// Snapshot of the journey being tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveJourneyItem {
    pub active: bool,
    pub start_time: Option<String>,
    pub start_location: Option<String>,
    pub current_distance_km: f64,
}

/// Result of a start or finish call.
#[derive(Debug, Clone, PartialEq)]
pub struct JourneyActionResponse {
    pub ok: bool,
    /// Completed journey ID for a finish call.
    pub journey_id: Option<String>,
    /// Set when the location fell back to the unknown sentinel.
    pub location_notice: Option<String>,
    pub state: ActiveJourneyItem,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteListResponse {
    pub items: Vec<NoteItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsItem {
    pub push_notifications: bool,
    /// `Default|Beep|Chime|Silent`.
    pub notification_sound: String,
    pub reminder_lead_minutes: u32,
    /// `light|dark|system`.
    pub theme: String,
    pub voice_language: String,
    /// `light|dark`, resolved against the host appearance passed in.
    pub resolved_theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    pub settings: Option<SettingsItem>,
    pub message: String,
}

/// Creates a task, or edits it in place when `id` is set.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Blank title, unknown priority/repeat or malformed `scheduled_at` fail
///   without writing.
/// - Editing an unknown ID succeeds with `id=None`.
#[flutter_rust_bridge::frb(sync)]
#[allow(clippy::too_many_arguments)]
pub fn task_save(
    id: Option<String>,
    title: String,
    description: String,
    scheduled_at: String,
    priority: String,
    repeat: String,
    important: bool,
) -> ActionResponse {
    let draft = match task_draft(id, title, description, &scheduled_at, &priority, &repeat, important)
    {
        Ok(draft) => draft,
        Err(message) => return ActionResponse::failure(format!("task_save failed: {message}")),
    };
    match with_store(|store| TaskService::new(store).save(draft)) {
        Ok(Ok(Some(task))) => ActionResponse::success("Task saved.", Some(task.id)),
        Ok(Ok(None)) => ActionResponse::success("Task not found.", None),
        Ok(Err(err)) => ActionResponse::failure(format!("task_save failed: {err}")),
        Err(err) => ActionResponse::failure(format!("task_save failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_completed(id: String) -> ActionResponse {
    match with_store(|store| TaskService::new(store).toggle_completed(id.trim())) {
        Ok(Some(task)) => ActionResponse::success(
            if task.completed {
                "Task completed."
            } else {
                "Task reopened."
            },
            Some(task.id),
        ),
        Ok(None) => ActionResponse::success("Task not found.", None),
        Err(err) => ActionResponse::failure(format!("task_toggle_completed failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> ActionResponse {
    delete_response("task_delete", with_store(|store| TaskService::new(store).delete(id.trim())))
}

/// Home screen list: earliest pending tasks, at most `limit` (default 5).
#[flutter_rust_bridge::frb(sync)]
pub fn task_pending(limit: Option<u32>) -> TaskListResponse {
    let limit = limit.map_or(HOME_PENDING_LIMIT, |value| value as usize);
    match with_store(|store| TaskService::new(store).pending(Some(limit))) {
        Ok(tasks) => task_list(tasks),
        Err(err) => TaskListResponse {
            items: Vec::new(),
            message: format!("task_pending failed: {err}"),
        },
    }
}

/// Task list screen with title search and completed toggle.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_visible(search: String, show_completed: bool) -> TaskListResponse {
    let query = TaskQuery {
        search,
        show_completed,
    };
    match with_store(|store| TaskService::new(store).visible(&query)) {
        Ok(tasks) => task_list(tasks),
        Err(err) => TaskListResponse {
            items: Vec::new(),
            message: format!("task_list_visible failed: {err}"),
        },
    }
}

/// Schedules an upcoming manual journey.
#[flutter_rust_bridge::frb(sync)]
pub fn journey_schedule(
    title: String,
    start_time: String,
    start_location: String,
    destination: String,
) -> ActionResponse {
    let start_time = match parse_input_time(&start_time) {
        Ok(value) => value,
        Err(err) => return ActionResponse::failure(format!("journey_schedule failed: {err}")),
    };
    let draft = organiser_core::JourneyDraft {
        title,
        start_time,
        start_location,
        destination,
    };
    match with_store(|store| JourneyService::new(store).schedule(draft)) {
        Ok(Ok(journey)) => ActionResponse::success("Journey scheduled.", Some(journey.id)),
        Ok(Err(err)) => ActionResponse::failure(format!("journey_schedule failed: {err}")),
        Err(err) => ActionResponse::failure(format!("journey_schedule failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn journey_delete(id: String) -> ActionResponse {
    delete_response(
        "journey_delete",
        with_store(|store| JourneyService::new(store).delete(id.trim())),
    )
}

/// Journey log, newest first.
///
/// `filter` is `all|upcoming|completed`; anything else is treated as `all`.
#[flutter_rust_bridge::frb(sync)]
pub fn journey_list(filter: String, search: String) -> JourneyListResponse {
    journey_list_at(&resolve_db_path(), &filter, search)
}

/// Current tracking buffer; cleared snapshot on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn journey_status() -> ActiveJourneyItem {
    journey_status_at(&resolve_db_path())
}

/// Starts tracking a journey at the given position.
///
/// # FFI contract
/// - `lat`/`lng` both present and on the globe means a position fix;
///   otherwise the start location falls back to the unknown sentinel and
///   `location_notice` is set.
/// - Calling while a journey is active fails without changing it.
#[flutter_rust_bridge::frb(sync)]
pub fn journey_start(lat: Option<f64>, lng: Option<f64>) -> JourneyActionResponse {
    journey_start_at(&resolve_db_path(), position_fix(lat, lng))
}

/// Adds a position sample to the active journey's distance.
///
/// Non-finite or out-of-range coordinates are rejected without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn journey_record_position(lat: f64, lng: f64) -> JourneyActionResponse {
    journey_record_position_at(&resolve_db_path(), lat, lng)
}

/// Confirmation gate shown before asking for a title.
///
/// # FFI contract
/// - `ok=true` while a journey is in progress; nothing is changed.
/// - `ok=false` with "no journey in progress" when idle.
#[flutter_rust_bridge::frb(sync)]
pub fn journey_request_end() -> ActionResponse {
    journey_request_end_at(&resolve_db_path())
}

/// Ends the active journey after the user confirmed, writing one completed
/// journey titled `title` (or "Untitled Trip").
#[flutter_rust_bridge::frb(sync)]
pub fn journey_finish(title: String, lat: Option<f64>, lng: Option<f64>) -> JourneyActionResponse {
    journey_finish_at(&resolve_db_path(), &title, position_fix(lat, lng))
}

/// Creates a note, or edits it in place when `id` is set.
///
/// Empty title and empty content discard the draft (`ok=true`, `id=None`).
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(id: Option<String>, title: String, content: String) -> ActionResponse {
    let draft = NoteDraft {
        id: id.map(|value| value.trim().to_string()),
        title,
        content,
    };
    let outcome = with_store(|store| {
        let clock = SystemClock;
        NoteService::new(store, &clock).save(draft)
    });
    match outcome {
        Ok(Some(note)) => ActionResponse::success("Note saved.", Some(note.id)),
        Ok(None) => ActionResponse::success("Nothing to save.", None),
        Err(err) => ActionResponse::failure(format!("note_save failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(id: String) -> ActionResponse {
    let outcome = with_store(|store| {
        let clock = SystemClock;
        NoteService::new(store, &clock).delete(id.trim())
    });
    delete_response("note_delete", outcome)
}

#[flutter_rust_bridge::frb(sync)]
pub fn note_list() -> NoteListResponse {
    let outcome = with_store(|store| {
        let clock = SystemClock;
        NoteService::new(store, &clock).list()
    });
    match outcome {
        Ok(notes) => {
            let items = notes.iter().map(to_note_item).collect::<Vec<_>>();
            NoteListResponse {
                message: count_message(items.len()),
                items,
            }
        }
        Err(err) => NoteListResponse {
            items: Vec::new(),
            message: format!("note_list failed: {err}"),
        },
    }
}

/// Stored settings with the theme resolved for `host_dark`.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_get(host_dark: bool) -> SettingsResponse {
    match with_store(|store| SettingsStore::new(store).get()) {
        Ok(settings) => settings_response(&settings, host_dark, "Settings loaded."),
        Err(err) => SettingsResponse {
            ok: false,
            settings: None,
            message: format!("settings_get failed: {err}"),
        },
    }
}

/// Field-level settings update; `None` fields are left untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_update(
    push_notifications: Option<bool>,
    notification_sound: Option<String>,
    reminder_lead_minutes: Option<u32>,
    theme: Option<String>,
    voice_language: Option<String>,
    host_dark: bool,
) -> SettingsResponse {
    let patch = match settings_patch(
        push_notifications,
        notification_sound,
        reminder_lead_minutes,
        theme,
        voice_language,
    ) {
        Ok(patch) => patch,
        Err(message) => return settings_failure(&message),
    };
    match with_store(|store| SettingsStore::new(store).update(patch)) {
        Ok(Ok(settings)) => settings_response(&settings, host_dark, "Settings saved."),
        Ok(Err(err)) => settings_failure(&err.to_string()),
        Err(err) => settings_failure(&err),
    }
}

/// Settings page "Reset app data": drops every task, journey, note, the
/// tracking buffer and the settings.
#[flutter_rust_bridge::frb(sync)]
pub fn reset_app_data() -> ActionResponse {
    match with_store(reset_all) {
        Ok(()) => ActionResponse::success("App data reset.", None),
        Err(err) => ActionResponse::failure(format!("reset_app_data failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| CoreConfig::from_env().db_path)
        .clone()
}

fn with_store<T>(f: impl FnOnce(&dyn KeyValueStore) -> T) -> Result<T, String> {
    with_store_at(&resolve_db_path(), f)
}

fn with_store_at<T>(path: &Path, f: impl FnOnce(&dyn KeyValueStore) -> T) -> Result<T, String> {
    let conn = open_db(path).map_err(|err| {
        log::error!("event=ffi_call module=ffi status=error error_code=db_open_failed");
        format!("DB open failed: {err}")
    })?;
    let store = SqliteKeyValueStore::new(&conn);
    Ok(f(&store))
}

fn journey_list_at(path: &Path, filter: &str, search: String) -> JourneyListResponse {
    let query = JourneyQuery {
        filter: journey_filter(filter),
        search,
    };
    match with_store_at(path, |store| JourneyService::new(store).list(&query)) {
        Ok(journeys) => {
            let items = journeys.iter().map(to_journey_item).collect::<Vec<_>>();
            JourneyListResponse {
                message: count_message(items.len()),
                items,
            }
        }
        Err(err) => JourneyListResponse {
            items: Vec::new(),
            message: format!("journey_list failed: {err}"),
        },
    }
}

fn journey_status_at(path: &Path) -> ActiveJourneyItem {
    with_store_at(path, |store| {
        let clock = SystemClock;
        JourneyController::restore(store, &clock).active_state()
    })
    .map_or_else(|_| to_active_item(&ActiveJourneyState::cleared()), |state| to_active_item(&state))
}

fn journey_start_at(path: &Path, fix: LocationFix) -> JourneyActionResponse {
    let outcome = with_store_at(path, |store| {
        let clock = SystemClock;
        let mut controller = JourneyController::restore(store, &clock);
        match controller.start_journey() {
            StartOutcome::Requested(ticket) => Ok(controller.resolve_start(ticket, fix)),
            StartOutcome::AlreadyActive | StartOutcome::AlreadyPending => {
                Err(controller.active_state())
            }
        }
    });

    match outcome {
        Ok(Ok(Some(started))) => JourneyActionResponse {
            ok: true,
            journey_id: None,
            location_notice: started.location_error.map(|err| err.to_string()),
            state: to_active_item(&started.state),
            message: "Journey started.".to_string(),
        },
        Ok(Ok(None)) => journey_failure("journey_start failed: request superseded", None),
        Ok(Err(state)) => {
            journey_failure("journey_start failed: journey already in progress", Some(&state))
        }
        Err(err) => journey_failure(&format!("journey_start failed: {err}"), None),
    }
}

fn journey_record_position_at(path: &Path, lat: f64, lng: f64) -> JourneyActionResponse {
    let coords = match position_fix(Some(lat), Some(lng)) {
        Ok(coords) => coords,
        Err(_) => {
            return journey_failure("journey_record_position failed: invalid coordinates", None)
        }
    };
    let outcome = with_store_at(path, |store| {
        let clock = SystemClock;
        let mut controller = JourneyController::restore(store, &clock);
        controller
            .record_position(coords)
            .map(|_| controller.active_state())
    });

    match outcome {
        Ok(Some(state)) => JourneyActionResponse {
            ok: true,
            journey_id: None,
            location_notice: None,
            state: to_active_item(&state),
            message: "Position recorded.".to_string(),
        },
        Ok(None) => journey_failure("journey_record_position failed: no journey in progress", None),
        Err(err) => journey_failure(&format!("journey_record_position failed: {err}"), None),
    }
}

fn journey_request_end_at(path: &Path) -> ActionResponse {
    let outcome = with_store_at(path, |store| {
        let clock = SystemClock;
        JourneyController::restore(store, &clock)
            .request_end()
            .map(|_| ())
    });
    match outcome {
        Ok(Ok(())) => ActionResponse::success("Journey in progress.", None),
        Ok(Err(err)) => ActionResponse::failure(format!("journey_request_end failed: {err}")),
        Err(err) => ActionResponse::failure(format!("journey_request_end failed: {err}")),
    }
}

fn journey_finish_at(path: &Path, title: &str, fix: LocationFix) -> JourneyActionResponse {
    let outcome = with_store_at(path, |store| {
        let clock = SystemClock;
        let mut controller = JourneyController::restore(store, &clock);
        let confirmation = controller.request_end()?;
        let ticket = controller.finalize(confirmation, title)?;
        Ok::<_, organiser_core::JourneyError>(controller.resolve_finalize(ticket, fix))
    });

    match outcome {
        Ok(Ok(Some(finalized))) => JourneyActionResponse {
            ok: true,
            journey_id: Some(finalized.journey.id),
            location_notice: finalized.location_error.map(|err| err.to_string()),
            state: to_active_item(&ActiveJourneyState::cleared()),
            message: "Journey saved.".to_string(),
        },
        Ok(Ok(None)) => journey_failure("journey_finish failed: request superseded", None),
        Ok(Err(err)) => journey_failure(&format!("journey_finish failed: {err}"), None),
        Err(err) => journey_failure(&format!("journey_finish failed: {err}"), None),
    }
}

fn parse_input_time(raw: &str) -> Result<organiser_core::Timestamp, ValidationError> {
    parse_timestamp(raw).ok_or_else(|| ValidationError::InvalidTimestamp(raw.trim().to_string()))
}

fn task_draft(
    id: Option<String>,
    title: String,
    description: String,
    scheduled_at: &str,
    priority: &str,
    repeat: &str,
    important: bool,
) -> Result<TaskDraft, String> {
    let scheduled_at = parse_input_time(scheduled_at).map_err(|err| err.to_string())?;
    let mut draft = TaskDraft::new(title, scheduled_at);
    draft.id = id.map(|value| value.trim().to_string());
    draft.description = description;
    draft.priority = parse_priority(priority)?;
    draft.repeat = parse_repeat(repeat)?;
    draft.important = important;
    Ok(draft)
}

fn settings_patch(
    push_notifications: Option<bool>,
    notification_sound: Option<String>,
    reminder_lead_minutes: Option<u32>,
    theme: Option<String>,
    voice_language: Option<String>,
) -> Result<SettingsPatch, String> {
    Ok(SettingsPatch {
        push_notifications,
        notification_sound: notification_sound
            .as_deref()
            .map(parse_sound)
            .transpose()?,
        reminder_lead_minutes,
        theme: theme.as_deref().map(parse_theme).transpose()?,
        voice_language,
    })
}

fn position_fix(lat: Option<f64>, lng: Option<f64>) -> LocationFix {
    match (lat, lng) {
        (Some(lat), Some(lng)) if Coordinates::new(lat, lng).is_valid() => {
            Ok(Coordinates::new(lat, lng))
        }
        _ => Err(LocationError::Unavailable),
    }
}

fn parse_priority(raw: &str) -> Result<Priority, String> {
    match raw.trim() {
        "" | "Medium" => Ok(Priority::Medium),
        "High" => Ok(Priority::High),
        "Low" => Ok(Priority::Low),
        other => Err(format!("unknown priority `{other}`")),
    }
}

fn parse_repeat(raw: &str) -> Result<RepeatFrequency, String> {
    match raw.trim() {
        "" | "None" => Ok(RepeatFrequency::Never),
        "Daily" => Ok(RepeatFrequency::Daily),
        "WorkDays" => Ok(RepeatFrequency::WorkDays),
        "Weekends" => Ok(RepeatFrequency::Weekends),
        "Weekly" => Ok(RepeatFrequency::Weekly),
        "Monthly" => Ok(RepeatFrequency::Monthly),
        other => Err(format!("unknown repeat `{other}`")),
    }
}

fn parse_sound(raw: &str) -> Result<NotificationSound, String> {
    match raw.trim() {
        "Default" => Ok(NotificationSound::Standard),
        "Beep" => Ok(NotificationSound::Beep),
        "Chime" => Ok(NotificationSound::Chime),
        "Silent" => Ok(NotificationSound::Silent),
        other => Err(format!("unknown notification sound `{other}`")),
    }
}

fn parse_theme(raw: &str) -> Result<ThemePreference, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "light" => Ok(ThemePreference::Light),
        "dark" => Ok(ThemePreference::Dark),
        "system" => Ok(ThemePreference::System),
        other => Err(format!("unknown theme `{other}`")),
    }
}

fn journey_filter(raw: &str) -> JourneyFilter {
    match raw.trim().to_ascii_lowercase().as_str() {
        "upcoming" => JourneyFilter::Upcoming,
        "completed" => JourneyFilter::Completed,
        _ => JourneyFilter::All,
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

fn repeat_label(repeat: RepeatFrequency) -> &'static str {
    match repeat {
        RepeatFrequency::Never => "None",
        RepeatFrequency::Daily => "Daily",
        RepeatFrequency::WorkDays => "WorkDays",
        RepeatFrequency::Weekends => "Weekends",
        RepeatFrequency::Weekly => "Weekly",
        RepeatFrequency::Monthly => "Monthly",
    }
}

fn status_label(status: JourneyStatus) -> &'static str {
    match status {
        JourneyStatus::Upcoming => "upcoming",
        JourneyStatus::InProgress => "in-progress",
        JourneyStatus::Completed => "completed",
    }
}

fn sound_label(sound: NotificationSound) -> &'static str {
    match sound {
        NotificationSound::Standard => "Default",
        NotificationSound::Beep => "Beep",
        NotificationSound::Chime => "Chime",
        NotificationSound::Silent => "Silent",
    }
}

fn theme_label(theme: ThemePreference) -> &'static str {
    match theme {
        ThemePreference::Light => "light",
        ThemePreference::Dark => "dark",
        ThemePreference::System => "system",
    }
}

fn appearance_label(appearance: Appearance) -> &'static str {
    match appearance {
        Appearance::Light => "light",
        Appearance::Dark => "dark",
    }
}

fn count_message(count: usize) -> String {
    if count == 0 {
        "No results.".to_string()
    } else {
        format!("Found {count} result(s).")
    }
}

fn delete_response(operation: &str, outcome: Result<bool, String>) -> ActionResponse {
    match outcome {
        Ok(true) => ActionResponse::success("Deleted.", None),
        Ok(false) => ActionResponse::success("Already deleted.", None),
        Err(err) => ActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn task_list(tasks: Vec<Task>) -> TaskListResponse {
    let items = tasks.iter().map(to_task_item).collect::<Vec<_>>();
    TaskListResponse {
        message: count_message(items.len()),
        items,
    }
}

fn journey_failure(message: &str, state: Option<&ActiveJourneyState>) -> JourneyActionResponse {
    let cleared = ActiveJourneyState::cleared();
    JourneyActionResponse {
        ok: false,
        journey_id: None,
        location_notice: None,
        state: to_active_item(state.unwrap_or(&cleared)),
        message: message.to_string(),
    }
}

fn settings_response(settings: &Settings, host_dark: bool, message: &str) -> SettingsResponse {
    let ambient = if host_dark {
        Appearance::Dark
    } else {
        Appearance::Light
    };
    SettingsResponse {
        ok: true,
        settings: Some(SettingsItem {
            push_notifications: settings.push_notifications,
            notification_sound: sound_label(settings.notification_sound).to_string(),
            reminder_lead_minutes: settings.reminder_lead_minutes,
            theme: theme_label(settings.theme).to_string(),
            voice_language: settings.voice_language.clone(),
            resolved_theme: appearance_label(settings.resolve_theme(ambient)).to_string(),
        }),
        message: message.to_string(),
    }
}

fn settings_failure(reason: &str) -> SettingsResponse {
    SettingsResponse {
        ok: false,
        settings: None,
        message: format!("settings_update failed: {reason}"),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        scheduled_at: format_timestamp(&task.scheduled_at),
        completed: task.completed,
        priority: priority_label(task.priority).to_string(),
        repeat: repeat_label(task.repeat).to_string(),
        important: task.important,
    }
}

fn to_journey_item(journey: &Journey) -> JourneyItem {
    JourneyItem {
        id: journey.id.clone(),
        title: journey.title.clone(),
        start_time: format_timestamp(&journey.start_time),
        end_time: journey.end_time.as_ref().map(format_timestamp),
        start_location: journey.start_location.clone(),
        end_location: journey.end_location.clone(),
        planned_destination: journey.planned_destination.clone(),
        distance_km: journey.distance,
        status: status_label(journey.status).to_string(),
        is_auto: journey.is_auto,
    }
}

fn to_active_item(state: &ActiveJourneyState) -> ActiveJourneyItem {
    ActiveJourneyItem {
        active: state.active,
        start_time: state.start_time.as_ref().map(format_timestamp),
        start_location: state.start_location.clone(),
        current_distance_km: state.current_distance,
    }
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: note.id.clone(),
        title: note.title.clone(),
        content: note.content.clone(),
        updated_at: format_timestamp(&note.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, journey_finish_at, journey_list, journey_list_at,
        journey_record_position_at, journey_request_end_at, journey_schedule, journey_start_at,
        journey_status_at, note_save, position_fix, settings_update, task_list_visible, task_save,
        task_toggle_completed, with_store_at,
    };
    use organiser_core::{
        reset_all, KeyValueStore, LocationError, NoteDraft, NoteService, SystemClock,
        UNKNOWN_LOCATION,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn task_save_then_search_and_toggle() {
        let token = unique_token("task");
        let saved = task_save(
            None,
            format!("Pay bill {token}"),
            "  ".to_string(),
            "2030-01-02T09:00".to_string(),
            "High".to_string(),
            "Monthly".to_string(),
            true,
        );
        assert!(saved.ok, "{}", saved.message);
        let id = saved.id.expect("created task should return id");

        let listed = task_list_visible(token.clone(), false);
        let item = listed
            .items
            .iter()
            .find(|item| item.id == id)
            .expect("task should be visible");
        assert_eq!(item.scheduled_at, "2030-01-02T09:00:00.000Z");
        assert_eq!(item.priority, "High");
        assert_eq!(item.repeat, "Monthly");
        assert_eq!(item.description, None);

        let toggled = task_toggle_completed(id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        assert!(task_list_visible(token.clone(), false).items.is_empty());
        assert_eq!(task_list_visible(token, true).items.len(), 1);
    }

    #[test]
    fn task_save_rejects_bad_input_without_writing() {
        let token = unique_token("bad-task");
        let bad_time = task_save(
            None,
            token.clone(),
            String::new(),
            "next tuesday".to_string(),
            "Medium".to_string(),
            "None".to_string(),
            false,
        );
        assert!(!bad_time.ok);
        assert!(bad_time.message.contains("invalid date-time"));

        let bad_priority = task_save(
            None,
            token.clone(),
            String::new(),
            "2030-01-02T09:00".to_string(),
            "Urgent".to_string(),
            "None".to_string(),
            false,
        );
        assert!(!bad_priority.ok);
        assert!(task_list_visible(token, true).items.is_empty());
    }

    #[test]
    fn journey_schedule_lists_as_upcoming() {
        let token = unique_token("journey");
        let response = journey_schedule(
            format!("Airport {token}"),
            "2030-03-04T06:30:00Z".to_string(),
            "Home".to_string(),
            "Terminal 2".to_string(),
        );
        assert!(response.ok, "{}", response.message);

        let listed = journey_list("upcoming".to_string(), token.clone());
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].status, "upcoming");
        assert_eq!(listed.items[0].planned_destination.as_deref(), Some("Terminal 2"));
        assert!(journey_list("completed".to_string(), token).items.is_empty());
    }

    #[test]
    fn journey_start_and_finish_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("organiser.sqlite3");

        let idle = journey_request_end_at(&path);
        assert!(!idle.ok);
        assert!(idle.message.contains("no journey in progress"));

        let started = journey_start_at(&path, position_fix(Some(17.385044), Some(78.486671)));
        assert!(started.ok, "{}", started.message);
        assert_eq!(started.location_notice, None);
        assert_eq!(started.state.start_location.as_deref(), Some("Loc: 17.3850, 78.4867"));
        assert!(journey_status_at(&path).active);
        assert!(journey_request_end_at(&path).ok);

        let again = journey_start_at(&path, position_fix(None, None));
        assert!(!again.ok);
        assert!(again.state.active);

        let finished = journey_finish_at(&path, "Trip A", position_fix(None, None));
        assert!(finished.ok, "{}", finished.message);
        assert!(finished.location_notice.is_some());
        assert!(!finished.state.active);

        let listed = journey_list_at(&path, "completed", String::new());
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].title, "Trip A");
        assert_eq!(listed.items[0].end_location.as_deref(), Some(UNKNOWN_LOCATION));
        assert!(listed.items[0].is_auto);
    }

    #[test]
    fn invalid_position_sample_keeps_the_journey_active() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("organiser.sqlite3");
        assert!(journey_start_at(&path, position_fix(Some(0.0), Some(0.0))).ok);

        let rejected = journey_record_position_at(&path, f64::NAN, 2.0);
        assert!(!rejected.ok);
        assert!(rejected.message.contains("invalid coordinates"));
        assert!(!journey_record_position_at(&path, 0.0, 181.0).ok);

        let status = journey_status_at(&path);
        assert!(status.active);
        assert_eq!(status.current_distance_km, 0.0);

        let recorded = journey_record_position_at(&path, 1.0, 0.0);
        assert!(recorded.ok, "{}", recorded.message);
        assert!(recorded.state.current_distance_km > 111.0);
    }

    #[test]
    fn note_save_discards_empty_draft() {
        let response = note_save(None, String::new(), String::new());
        assert!(response.ok);
        assert_eq!(response.id, None);
    }

    #[test]
    fn settings_update_rejects_unknown_theme() {
        let response = settings_update(None, None, None, Some("sepia".to_string()), None, false);
        assert!(!response.ok);
        assert!(response.message.contains("sepia"));
    }

    #[test]
    fn partial_coordinates_count_as_unavailable() {
        assert_eq!(position_fix(Some(1.0), None), Err(LocationError::Unavailable));
        assert_eq!(position_fix(Some(f64::NAN), Some(1.0)), Err(LocationError::Unavailable));
        assert_eq!(position_fix(Some(-91.0), Some(1.0)), Err(LocationError::Unavailable));
    }

    #[test]
    fn reset_clears_an_isolated_database() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("organiser.sqlite3");

        with_store_at(&path, |store| {
            let clock = SystemClock;
            NoteService::new(store, &clock).save(NoteDraft {
                id: None,
                title: "keep?".to_string(),
                content: "no".to_string(),
            })
        })
        .expect("open temp db")
        .expect("note saved");

        with_store_at(&path, reset_all).expect("open temp db");

        let remaining = with_store_at(&path, |store| KeyValueStore::get_raw(store, "notes"))
            .expect("open temp db")
            .expect("read slot");
        assert_eq!(remaining, None);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
