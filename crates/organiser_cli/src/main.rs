//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `organiser_core` linkage.
//! - Summarize an on-disk store: `organiser [db_path]`, defaulting to
//!   `ORGANISER_DB_PATH` or the temp-dir database.

use organiser_core::db::open_db;
use organiser_core::{
    CoreConfig, JourneyController, JourneyService, NoteService, SettingsStore,
    SqliteKeyValueStore, SystemClock, TaskService, HOME_PENDING_LIMIT,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("organiser_core version={}", organiser_core::core_version());

    let config = CoreConfig::from_env();
    let db_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or(config.db_path);
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open {}: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let store = SqliteKeyValueStore::new(&conn);
    let clock = SystemClock;
    let tasks = TaskService::new(&store);
    let settings = SettingsStore::new(&store).get();
    let controller =
        JourneyController::restore(&store, &clock).with_location_timeout(config.location_timeout);

    println!("db={}", db_path.display());
    println!(
        "tasks total={} pending={} home={}",
        tasks.all().len(),
        tasks.pending(None).len(),
        tasks.pending(Some(HOME_PENDING_LIMIT)).len()
    );
    println!("journeys total={}", JourneyService::new(&store).all().len());
    println!("notes total={}", NoteService::new(&store, &clock).list().len());
    println!(
        "journey phase={:?} location_timeout_ms={}",
        controller.phase(),
        config.location_timeout.as_millis()
    );
    println!(
        "settings theme={:?} reminder_minutes={} voice={}",
        settings.theme, settings.reminder_lead_minutes, settings.voice_language
    );
    ExitCode::SUCCESS
}
