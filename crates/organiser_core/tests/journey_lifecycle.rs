use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use organiser_core::{
    ActiveJourneyState, Clock, Coordinates, FixedClock, JourneyController, JourneyError, JourneyPhase,
    Journey, JourneyStatus, KeyValueStore, LocationError, LocationFix, LocationProvider,
    MemoryKeyValueStore, NoLocation, RecordCollection, StartOutcome, StaticLocation,
    UNKNOWN_LOCATION, UNTITLED_TRIP,
};
use std::time::Duration;

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap())
}

fn journeys(store: &MemoryKeyValueStore) -> Vec<Journey> {
    RecordCollection::<Journey>::new(store).all()
}

fn start(controller: &mut JourneyController<'_>, fix: LocationFix) {
    let StartOutcome::Requested(ticket) = controller.start_journey() else {
        panic!("controller should issue a start request");
    };
    controller
        .resolve_start(ticket, fix)
        .expect("fresh ticket should start the journey");
}

fn finish(controller: &mut JourneyController<'_>, title: &str, fix: LocationFix) -> Journey {
    let confirmation = controller.request_end().expect("journey is active");
    let ticket = controller.finalize(confirmation, title).expect("confirmed");
    controller
        .resolve_finalize(ticket, fix)
        .expect("fresh ticket should finalize")
        .journey
}

/// Never answers; only a timeout ends the wait.
struct SilentProvider;

impl LocationProvider for SilentProvider {
    async fn current_position(&self) -> LocationFix {
        std::future::pending().await
    }
}

#[test]
fn start_enters_active_and_persists_immediately() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    assert_eq!(controller.phase(), JourneyPhase::Idle);

    start(&mut controller, Ok(Coordinates::new(17.385044, 78.486671)));

    assert_eq!(controller.phase(), JourneyPhase::Active);
    let persisted: ActiveJourneyState =
        serde_json::from_str(&store.get_raw("active_journey").unwrap().unwrap()).unwrap();
    assert!(persisted.active);
    assert_eq!(persisted.start_time, Some(clock.now()));
    assert_eq!(persisted.start_location.as_deref(), Some("Loc: 17.3850, 78.4867"));
    assert_eq!(persisted.start_coords, Some(Coordinates::new(17.385044, 78.486671)));
    assert_eq!(persisted.current_distance, 0.0);
}

#[test]
fn start_while_active_is_a_noop() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Ok(Coordinates::new(1.0, 1.0)));
    let before = controller.active_state();

    clock.advance(ChronoDuration::minutes(5));
    assert_eq!(controller.start_journey(), StartOutcome::AlreadyActive);

    assert_eq!(controller.active_state(), before);
    assert!(journeys(&store).is_empty());
}

#[test]
fn second_start_while_request_outstanding_is_a_noop() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);

    assert!(matches!(controller.start_journey(), StartOutcome::Requested(_)));
    assert_eq!(controller.start_journey(), StartOutcome::AlreadyPending);
    assert_eq!(controller.phase(), JourneyPhase::Idle);
}

#[test]
fn failed_fix_starts_with_unknown_location() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);

    let StartOutcome::Requested(ticket) = controller.start_journey() else {
        panic!("expected start request");
    };
    let started = controller
        .resolve_start(ticket, Err(LocationError::Denied))
        .unwrap();

    assert_eq!(started.location_error, Some(LocationError::Denied));
    assert_eq!(started.state.start_location.as_deref(), Some(UNKNOWN_LOCATION));
    assert_eq!(started.state.start_coords, None);
    assert_eq!(controller.phase(), JourneyPhase::Active);
}

#[test]
fn finalize_produces_one_completed_journey_and_clears_state() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Ok(Coordinates::new(0.0, 0.0)));
    let started_at = controller.active_state().start_time.unwrap();

    clock.advance(ChronoDuration::minutes(30));
    let journey = finish(&mut controller, "Trip A", Ok(Coordinates::new(0.0, 1.0)));

    assert_eq!(journey.title, "Trip A");
    assert_eq!(journey.status, JourneyStatus::Completed);
    assert!(journey.is_auto);
    assert_eq!(journey.start_time, started_at);
    assert_eq!(journey.end_time, Some(started_at + ChronoDuration::minutes(30)));
    assert_eq!(journey.start_location, "Loc: 0.0000, 0.0000");
    assert_eq!(journey.end_location.as_deref(), Some("Loc: 0.0000, 1.0000"));
    assert_eq!(journey.distance, 111.19);
    assert_eq!(journey.validate(), Ok(()));

    assert_eq!(journeys(&store), vec![journey]);
    assert_eq!(controller.phase(), JourneyPhase::Idle);
    assert_eq!(controller.active_state(), ActiveJourneyState::cleared());

    let persisted: serde_json::Value =
        serde_json::from_str(&store.get_raw("active_journey").unwrap().unwrap()).unwrap();
    assert_eq!(
        persisted,
        serde_json::json!({
            "isActive": false,
            "startTime": null,
            "startLocation": null,
            "startCoords": null,
            "currentDistance": 0.0
        })
    );
}

#[test]
fn blank_title_becomes_untitled_trip() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Err(LocationError::Unavailable));

    let journey = finish(&mut controller, "   ", Err(LocationError::Unavailable));

    assert_eq!(journey.title, UNTITLED_TRIP);
    assert_eq!(journey.start_location, UNKNOWN_LOCATION);
    assert_eq!(journey.end_location.as_deref(), Some(UNKNOWN_LOCATION));
    assert_eq!(journey.distance, 0.0);
}

#[test]
fn request_end_while_idle_reports_no_journey() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let controller = JourneyController::restore(&store, &clock);

    assert_eq!(
        controller.request_end(),
        Err(JourneyError::NoJourneyInProgress)
    );
    assert!(store.is_empty());
}

#[test]
fn confirmation_from_an_earlier_session_is_rejected() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Err(LocationError::Unavailable));
    let stale = controller.request_end().unwrap();
    finish(&mut controller, "first", Err(LocationError::Unavailable));

    clock.advance(ChronoDuration::hours(1));
    start(&mut controller, Err(LocationError::Unavailable));

    assert_eq!(
        controller.finalize(stale, "second"),
        Err(JourneyError::ConfirmationExpired)
    );
    assert_eq!(journeys(&store).len(), 1);
}

#[test]
fn restore_resumes_an_active_journey() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    {
        let mut controller = JourneyController::restore(&store, &clock);
        start(&mut controller, Ok(Coordinates::new(10.0, 10.0)));
    }

    let mut resumed = JourneyController::restore(&store, &clock);
    assert_eq!(resumed.phase(), JourneyPhase::Active);
    assert!(!resumed.has_pending_request());

    let journey = finish(&mut resumed, "after restart", Err(LocationError::Timeout));
    assert_eq!(journey.start_location, "Loc: 10.0000, 10.0000");
}

#[test]
fn restore_normalizes_inactive_state_with_leftovers() {
    let store = MemoryKeyValueStore::new();
    store
        .put_raw(
            "active_journey",
            r#"{"isActive":false,"startTime":"2024-06-01T08:00:00Z","startLocation":"x","startCoords":null,"currentDistance":4.2}"#,
        )
        .unwrap();
    let clock = clock();

    let controller = JourneyController::restore(&store, &clock);

    assert_eq!(controller.phase(), JourneyPhase::Idle);
    assert_eq!(controller.active_state(), ActiveJourneyState::cleared());
}

#[test]
fn late_result_after_cancel_is_ignored() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);

    let StartOutcome::Requested(late) = controller.start_journey() else {
        panic!("expected start request");
    };
    controller.cancel_pending();

    assert!(controller
        .resolve_start(late, Ok(Coordinates::new(1.0, 1.0)))
        .is_none());
    assert_eq!(controller.phase(), JourneyPhase::Idle);
    assert!(store.get_raw("active_journey").unwrap().is_none());
}

#[test]
fn superseded_finalize_result_is_ignored() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Ok(Coordinates::new(1.0, 1.0)));

    let confirmation = controller.request_end().unwrap();
    let first = controller.finalize(confirmation, "first try").unwrap();
    controller.cancel_pending();
    let confirmation = controller.request_end().unwrap();
    let second = controller.finalize(confirmation, "second try").unwrap();

    assert!(controller
        .resolve_finalize(first, Err(LocationError::Unavailable))
        .is_none());
    let done = controller
        .resolve_finalize(second, Err(LocationError::Unavailable))
        .unwrap();

    assert_eq!(done.journey.title, "second try");
    assert_eq!(journeys(&store).len(), 1);
}

#[test]
fn recorded_positions_accumulate_haversine_distance() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Ok(Coordinates::new(0.0, 0.0)));

    let after_first = controller
        .record_position(Coordinates::new(1.0, 0.0))
        .unwrap();
    let after_second = controller
        .record_position(Coordinates::new(2.0, 0.0))
        .unwrap();
    assert!((after_first - 111.19).abs() < 0.01);
    assert!((after_second - 222.39).abs() < 0.01);

    let journey = finish(&mut controller, "north", Ok(Coordinates::new(2.0, 0.0)));
    assert_eq!(journey.distance, 222.39);
}

#[test]
fn first_sample_without_start_coordinates_only_sets_origin() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Err(LocationError::Denied));

    assert_eq!(controller.record_position(Coordinates::new(5.0, 5.0)), Some(0.0));
    assert_eq!(controller.active_state().start_coords, None);
}

#[test]
fn invalid_sample_is_rejected_and_journey_stays_active() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Ok(Coordinates::new(0.0, 0.0)));
    controller.record_position(Coordinates::new(1.0, 0.0)).unwrap();
    let before = store.get_raw("active_journey").unwrap();

    assert_eq!(controller.record_position(Coordinates::new(f64::NAN, 2.0)), None);
    assert_eq!(controller.record_position(Coordinates::new(0.0, 200.0)), None);

    assert_eq!(store.get_raw("active_journey").unwrap(), before);
    let resumed = JourneyController::restore(&store, &clock);
    assert_eq!(resumed.phase(), JourneyPhase::Active);
    assert_eq!(resumed.active_state().last_coords, Some(Coordinates::new(1.0, 0.0)));
}

#[test]
fn non_finite_start_fix_falls_back_to_unknown_location() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);

    let StartOutcome::Requested(ticket) = controller.start_journey() else {
        panic!("expected start request");
    };
    let started = controller
        .resolve_start(ticket, Ok(Coordinates::new(f64::NAN, f64::NAN)))
        .unwrap();

    assert_eq!(started.location_error, Some(LocationError::Unavailable));
    assert_eq!(started.state.start_location.as_deref(), Some(UNKNOWN_LOCATION));
    assert_eq!(started.state.start_coords, None);
    assert_eq!(
        JourneyController::restore(&store, &clock).phase(),
        JourneyPhase::Active
    );
}

#[test]
fn out_of_range_end_fix_falls_back_to_unknown_location() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);
    start(&mut controller, Ok(Coordinates::new(0.0, 0.0)));

    let journey = finish(&mut controller, "Trip", Ok(Coordinates::new(95.0, 0.0)));

    assert_eq!(journey.end_location.as_deref(), Some(UNKNOWN_LOCATION));
    assert_eq!(journey.distance, 0.0);
    assert_eq!(journeys(&store), vec![journey]);
}

#[test]
fn record_position_while_idle_does_nothing() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);

    assert_eq!(controller.record_position(Coordinates::new(1.0, 1.0)), None);
    assert!(store.get_raw("active_journey").unwrap().is_none());
}

#[tokio::test]
async fn async_drivers_run_a_full_journey() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller = JourneyController::restore(&store, &clock);

    let started = controller
        .start_with(&StaticLocation(Ok(Coordinates::new(0.0, 0.0))))
        .await
        .expect("idle controller starts");
    assert_eq!(started.location_error, None);
    assert!(controller.start_with(&NoLocation).await.is_none());

    let confirmation = controller.request_end().unwrap();
    let finalized = controller
        .finalize_with(&NoLocation, confirmation, "Trip A")
        .await
        .unwrap();

    assert_eq!(finalized.location_error, Some(LocationError::Unsupported));
    assert_eq!(finalized.journey.end_location.as_deref(), Some(UNKNOWN_LOCATION));
    assert_eq!(controller.phase(), JourneyPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn silent_provider_times_out_to_unknown_location() {
    let store = MemoryKeyValueStore::new();
    let clock = clock();
    let mut controller =
        JourneyController::restore(&store, &clock).with_location_timeout(Duration::from_secs(3));

    let started = controller.start_with(&SilentProvider).await.unwrap();

    assert_eq!(started.location_error, Some(LocationError::Timeout));
    assert_eq!(started.state.start_location.as_deref(), Some(UNKNOWN_LOCATION));
    assert!(!controller.has_pending_request());
}
