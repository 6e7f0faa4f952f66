//! Journey log records and the in-progress tracking buffer.
//!
//! # Invariants
//! - `end_time` and `end_location` are present together, only when
//!   `status == Completed`.
//! - An inactive [`ActiveJourneyState`] carries no start data and zero distance.

use super::timestamp::{self, Timestamp};
use super::validation::ValidationError;
use super::{Record, RecordId};
use crate::store::keys;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JourneyStatus {
    Upcoming,
    InProgress,
    Completed,
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite, with latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Display label stored as a journey location.
    pub fn label(&self) -> String {
        format!("Loc: {:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A logged trip, scheduled by hand or captured live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: RecordId,
    pub title: String,
    #[serde(with = "timestamp::required")]
    pub start_time: Timestamp,
    #[serde(default, with = "timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    pub start_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<String>,
    /// Destination typed into the scheduling form; not an end location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_destination: Option<String>,
    #[serde(default)]
    pub distance: f64,
    pub status: JourneyStatus,
    #[serde(default)]
    pub is_auto: bool,
}

impl Journey {
    /// Manually scheduled journey: upcoming, zero distance, not auto.
    pub fn upcoming(
        title: impl Into<String>,
        start_time: Timestamp,
        start_location: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            start_time,
            end_time: None,
            start_location: start_location.into(),
            end_location: None,
            planned_destination: None,
            distance: 0.0,
            status: JourneyStatus::Upcoming,
            is_auto: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.start_location.trim().is_empty() {
            return Err(ValidationError::EmptyStartLocation);
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(ValidationError::InvalidDistance);
        }
        let completed = self.status == JourneyStatus::Completed;
        if self.end_time.is_some() != completed || self.end_location.is_some() != completed {
            return Err(ValidationError::InconsistentJourneyEnd);
        }
        Ok(())
    }
}

impl Record for Journey {
    const KEY: &'static str = keys::JOURNEYS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Singleton buffer for the journey currently being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveJourneyState {
    #[serde(rename = "isActive")]
    pub active: bool,
    #[serde(default, with = "timestamp::optional")]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub start_location: Option<String>,
    #[serde(default)]
    pub start_coords: Option<Coordinates>,
    /// Latest position sample, the origin of the next distance leg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_coords: Option<Coordinates>,
    /// Accumulated distance in kilometers.
    #[serde(default)]
    pub current_distance: f64,
}

impl Default for ActiveJourneyState {
    fn default() -> Self {
        Self::cleared()
    }
}

impl ActiveJourneyState {
    pub fn cleared() -> Self {
        Self {
            active: false,
            start_time: None,
            start_location: None,
            start_coords: None,
            last_coords: None,
            current_distance: 0.0,
        }
    }

    /// Fresh active buffer starting at `start_time`.
    pub fn started(
        start_time: Timestamp,
        start_location: String,
        start_coords: Option<Coordinates>,
    ) -> Self {
        Self {
            active: true,
            start_time: Some(start_time),
            start_location: Some(start_location),
            start_coords,
            last_coords: start_coords,
            current_distance: 0.0,
        }
    }

    /// Whether the inactive-means-cleared invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.active || *self == Self::cleared()
    }

    /// Returns the cleared form for inconsistent inactive state, else itself.
    pub fn normalized(self) -> Self {
        if self.is_consistent() {
            self
        } else {
            Self::cleared()
        }
    }
}
