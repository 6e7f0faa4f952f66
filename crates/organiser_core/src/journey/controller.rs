//! Journey lifecycle state machine.
//!
//! Position requests are split into an issue step, which returns a
//! [`LocationTicket`], and a resolve step that consumes it. A ticket is only
//! honored while it is the controller's one outstanding request, so results
//! arriving after a cancel or a newer request are dropped.

use super::distance::{haversine_km, round_km};
use super::location::{
    checked_fix, describe_fix, request_position, LocationError, LocationFix, LocationProvider, UNKNOWN_LOCATION,
};
use crate::clock::Clock;
use crate::model::journey::{ActiveJourneyState, Coordinates, Journey, JourneyStatus};
use crate::model::timestamp::Timestamp;
use crate::model::RecordId;
use crate::repo::collection::RecordCollection;
use crate::store::{keys, KeyValueStore, Slot};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Title used when a journey is finalized with a blank title.
pub const UNTITLED_TRIP: &str = "Untitled Trip";

pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyPhase {
    Idle,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixPurpose {
    Start,
    Finalize,
}

/// Handle for one outstanding position request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTicket {
    generation: u64,
    purpose: FixPurpose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Resolve with [`JourneyController::resolve_start`].
    Requested(LocationTicket),
    AlreadyActive,
    AlreadyPending,
}

/// Proof that the user confirmed ending the session that started at
/// `session_start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndConfirmation {
    session_start: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartedJourney {
    pub state: ActiveJourneyState,
    /// Set when the start location fell back to the sentinel.
    pub location_error: Option<LocationError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedJourney {
    pub journey: Journey,
    /// Set when the end location fell back to the sentinel.
    pub location_error: Option<LocationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyError {
    NoJourneyInProgress,
    /// The confirmation belongs to a session that is no longer active.
    ConfirmationExpired,
    /// Another position request is still outstanding.
    RequestPending,
}

impl Display for JourneyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoJourneyInProgress => write!(f, "no journey in progress"),
            Self::ConfirmationExpired => write!(f, "end confirmation no longer matches the active journey"),
            Self::RequestPending => write!(f, "a location request is already in progress"),
        }
    }
}

impl Error for JourneyError {}

#[derive(Debug)]
struct PendingRequest {
    generation: u64,
    purpose: FixPurpose,
    finalize: Option<PendingFinalize>,
}

#[derive(Debug)]
struct PendingFinalize {
    title: String,
    session_start: Option<Timestamp>,
}

pub struct JourneyController<'s> {
    active: Slot<'s, ActiveJourneyState>,
    journeys: RecordCollection<'s, Journey>,
    clock: &'s dyn Clock,
    location_timeout: Duration,
    generation: u64,
    pending: Option<PendingRequest>,
}

impl<'s> JourneyController<'s> {
    /// Resumes from the persisted buffer without contacting any sensor.
    ///
    /// An inactive buffer that still carries start data is rewritten in its
    /// cleared form.
    pub fn restore(store: &'s dyn KeyValueStore, clock: &'s dyn Clock) -> Self {
        let active: Slot<'s, ActiveJourneyState> = Slot::new(store, keys::ACTIVE_JOURNEY);
        let state = active.read();
        if !state.is_consistent() {
            warn!("event=journey_restore module=journey status=normalized reason=inactive_with_data");
            active.write(&state.normalized());
        }

        let controller = Self {
            active,
            journeys: RecordCollection::new(store),
            clock,
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
            generation: 0,
            pending: None,
        };
        info!(
            "event=journey_restore module=journey status=ok phase={:?}",
            controller.phase()
        );
        controller
    }

    pub fn with_location_timeout(mut self, timeout: Duration) -> Self {
        self.location_timeout = timeout;
        self
    }

    pub fn phase(&self) -> JourneyPhase {
        if self.active.read().active {
            JourneyPhase::Active
        } else {
            JourneyPhase::Idle
        }
    }

    pub fn active_state(&self) -> ActiveJourneyState {
        self.active.read()
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Issues the start-location request. No-op while active or while a
    /// request is outstanding.
    pub fn start_journey(&mut self) -> StartOutcome {
        if self.phase() == JourneyPhase::Active {
            return StartOutcome::AlreadyActive;
        }
        if self.pending.is_some() {
            return StartOutcome::AlreadyPending;
        }
        StartOutcome::Requested(self.issue(FixPurpose::Start, None))
    }

    /// Completes a start request and enters `Active`.
    ///
    /// Returns `None` when the ticket is stale or the journey became active
    /// meanwhile; nothing is written in that case.
    pub fn resolve_start(&mut self, ticket: LocationTicket, fix: LocationFix) -> Option<StartedJourney> {
        self.take_pending(&ticket, FixPurpose::Start)?;
        if self.phase() == JourneyPhase::Active {
            warn!("event=journey_start module=journey status=ignored reason=already_active");
            return None;
        }

        let fix = checked_fix(fix);
        let (location, coords) = describe_fix(&fix);
        let state = ActiveJourneyState::started(self.clock.now(), location, coords);
        self.active.write(&state);

        let location_error = fix.err();
        info!(
            "event=journey_start module=journey status=ok location_source={}",
            location_source(location_error)
        );
        Some(StartedJourney {
            state,
            location_error,
        })
    }

    /// Confirmation gate before finalizing. Does not change state.
    pub fn request_end(&self) -> Result<EndConfirmation, JourneyError> {
        let state = self.active.read();
        if !state.active {
            return Err(JourneyError::NoJourneyInProgress);
        }
        Ok(EndConfirmation {
            session_start: state.start_time,
        })
    }

    /// Issues the end-location request for a confirmed session.
    pub fn finalize(
        &mut self,
        confirmation: EndConfirmation,
        title: &str,
    ) -> Result<LocationTicket, JourneyError> {
        let state = self.active.read();
        if !state.active {
            return Err(JourneyError::NoJourneyInProgress);
        }
        if confirmation.session_start != state.start_time {
            return Err(JourneyError::ConfirmationExpired);
        }
        if self.pending.is_some() {
            return Err(JourneyError::RequestPending);
        }

        let finalize = PendingFinalize {
            title: title.trim().to_string(),
            session_start: state.start_time,
        };
        Ok(self.issue(FixPurpose::Finalize, Some(finalize)))
    }

    /// Writes the completed journey and clears the active buffer.
    ///
    /// Returns `None` without writing when the ticket is stale or the
    /// confirmed session is no longer the active one.
    pub fn resolve_finalize(
        &mut self,
        ticket: LocationTicket,
        fix: LocationFix,
    ) -> Option<FinalizedJourney> {
        let pending = self.take_pending(&ticket, FixPurpose::Finalize)?;
        let finalize = pending.finalize?;
        let state = self.active.read();
        if !state.active || state.start_time != finalize.session_start {
            warn!("event=journey_finalize module=journey status=ignored reason=session_changed");
            return None;
        }

        let now = self.clock.now();
        let fix = checked_fix(fix);
        let (end_location, end_coords) = describe_fix(&fix);
        let final_leg = match (state.last_coords, end_coords) {
            (Some(from), Some(to)) => haversine_km(from, to),
            _ => 0.0,
        };
        let title = if finalize.title.is_empty() {
            UNTITLED_TRIP.to_string()
        } else {
            finalize.title
        };

        let journey = Journey {
            id: RecordId::new(),
            title,
            start_time: state.start_time.unwrap_or(now),
            end_time: Some(now),
            start_location: state
                .start_location
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            end_location: Some(end_location),
            planned_destination: None,
            distance: round_km(state.current_distance + final_leg),
            status: JourneyStatus::Completed,
            is_auto: true,
        };
        let journey = self.journeys.create(journey);
        self.active.write(&ActiveJourneyState::cleared());

        let location_error = fix.err();
        info!(
            "event=journey_finalize module=journey status=ok location_source={} distance_km={:.2}",
            location_source(location_error),
            journey.distance
        );
        Some(FinalizedJourney {
            journey,
            location_error,
        })
    }

    /// Adds the leg from the previous sample to `coords` while active.
    ///
    /// Returns the accumulated distance, or `None` when idle or when
    /// `coords` is not a valid position; nothing is written in either case.
    /// The first sample of a session started without coordinates only sets
    /// the origin.
    pub fn record_position(&mut self, coords: Coordinates) -> Option<f64> {
        let mut state = self.active.read();
        if !state.active {
            return None;
        }
        if !coords.is_valid() {
            warn!("event=journey_position module=journey status=rejected reason=invalid_coordinates");
            return None;
        }
        if let Some(previous) = state.last_coords {
            state.current_distance += haversine_km(previous, coords);
        }
        state.last_coords = Some(coords);
        self.active.write(&state);
        Some(state.current_distance)
    }

    /// Drops the outstanding request; its ticket will be ignored.
    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
            info!("event=location_request module=journey status=cancelled");
        }
    }

    /// Starts a journey, awaiting the position under the configured timeout.
    pub async fn start_with(&mut self, provider: &impl LocationProvider) -> Option<StartedJourney> {
        let ticket = match self.start_journey() {
            StartOutcome::Requested(ticket) => ticket,
            StartOutcome::AlreadyActive | StartOutcome::AlreadyPending => return None,
        };
        let fix = request_position(provider, self.location_timeout).await;
        self.resolve_start(ticket, fix)
    }

    /// Finalizes a confirmed journey, awaiting the end position under the
    /// configured timeout.
    pub async fn finalize_with(
        &mut self,
        provider: &impl LocationProvider,
        confirmation: EndConfirmation,
        title: &str,
    ) -> Result<FinalizedJourney, JourneyError> {
        let ticket = self.finalize(confirmation, title)?;
        let fix = request_position(provider, self.location_timeout).await;
        self.resolve_finalize(ticket, fix)
            .ok_or(JourneyError::ConfirmationExpired)
    }

    fn issue(&mut self, purpose: FixPurpose, finalize: Option<PendingFinalize>) -> LocationTicket {
        self.generation += 1;
        self.pending = Some(PendingRequest {
            generation: self.generation,
            purpose,
            finalize,
        });
        info!(
            "event=location_request module=journey status=start purpose={purpose:?} generation={}",
            self.generation
        );
        LocationTicket {
            generation: self.generation,
            purpose,
        }
    }

    fn take_pending(&mut self, ticket: &LocationTicket, purpose: FixPurpose) -> Option<PendingRequest> {
        let matches = self.pending.as_ref().is_some_and(|pending| {
            pending.generation == ticket.generation
                && pending.purpose == ticket.purpose
                && pending.purpose == purpose
        });
        if !matches {
            warn!(
                "event=location_request module=journey status=stale generation={} current={}",
                ticket.generation, self.generation
            );
            return None;
        }
        self.pending.take()
    }
}

fn location_source(error: Option<LocationError>) -> &'static str {
    match error {
        None => "device",
        Some(err) => err.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::{JourneyController, JourneyError, StartOutcome};
    use crate::clock::FixedClock;
    use crate::journey::location::LocationError;
    use crate::model::journey::Coordinates;
    use crate::store::MemoryKeyValueStore;
    use chrono::{TimeZone, Utc};

    #[test]
    fn start_ticket_cannot_resolve_a_finalize() {
        let store = MemoryKeyValueStore::new();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let mut controller = JourneyController::restore(&store, &clock);

        let StartOutcome::Requested(start) = controller.start_journey() else {
            panic!("idle controller should issue a start request");
        };
        assert!(controller.resolve_finalize(start.clone(), Err(LocationError::Denied)).is_none());
        assert!(controller.has_pending_request());
        assert!(controller.resolve_start(start, Ok(Coordinates::new(1.0, 2.0))).is_some());
    }

    #[test]
    fn finalize_while_request_outstanding_is_rejected() {
        let store = MemoryKeyValueStore::new();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let mut controller = JourneyController::restore(&store, &clock);

        let StartOutcome::Requested(start) = controller.start_journey() else {
            panic!("expected start request");
        };
        controller.resolve_start(start, Err(LocationError::Unavailable));

        let confirmation = controller.request_end().unwrap();
        controller.finalize(confirmation.clone(), "A").unwrap();
        assert_eq!(
            controller.finalize(confirmation, "B"),
            Err(JourneyError::RequestPending)
        );
    }
}
