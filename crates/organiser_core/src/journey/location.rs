//! Device position source.

use crate::model::journey::Coordinates;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;

/// Location label used whenever no position could be obtained.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    /// The host has no positioning capability.
    Unsupported,
    Denied,
    Unavailable,
    /// No answer within the configured bound.
    Timeout,
}

impl LocationError {
    pub fn code(self) -> &'static str {
        match self {
            Self::Unsupported => "unsupported",
            Self::Denied => "denied",
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
        }
    }
}

impl Display for LocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "geolocation is not supported"),
            Self::Denied => write!(f, "location permission denied"),
            Self::Unavailable => write!(f, "unable to retrieve location"),
            Self::Timeout => write!(f, "location request timed out"),
        }
    }
}

impl Error for LocationError {}

pub type LocationFix = Result<Coordinates, LocationError>;

/// Single-shot, best-effort position request.
pub trait LocationProvider {
    fn current_position(&self) -> impl Future<Output = LocationFix>;
}

/// Provider for hosts without positioning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    async fn current_position(&self) -> LocationFix {
        Err(LocationError::Unsupported)
    }
}

/// Provider answering with a fixed result, for replays and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocation(pub LocationFix);

impl LocationProvider for StaticLocation {
    async fn current_position(&self) -> LocationFix {
        self.0
    }
}

/// Awaits one position, treating expiry of `timeout` as failure.
pub async fn request_position(provider: &impl LocationProvider, timeout: Duration) -> LocationFix {
    match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(fix) => fix,
        Err(_) => Err(LocationError::Timeout),
    }
}

/// Demotes a fix with non-finite or out-of-range coordinates to
/// `Unavailable`. Such values do not survive a JSON round trip.
pub fn checked_fix(fix: LocationFix) -> LocationFix {
    match fix {
        Ok(coords) if !coords.is_valid() => Err(LocationError::Unavailable),
        other => other,
    }
}

/// Label and coordinates recorded for a fix, with the sentinel on failure.
pub fn describe_fix(fix: &LocationFix) -> (String, Option<Coordinates>) {
    match fix {
        Ok(coords) if coords.is_valid() => (coords.label(), Some(*coords)),
        _ => (UNKNOWN_LOCATION.to_string(), None),
    }
}
