//! Boundary validation errors for form-driven writes.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection raised before any store is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task or journey saved without a title.
    EmptyTitle,
    /// Manual journey saved without a start location.
    EmptyStartLocation,
    /// Date-time form input could not be parsed.
    InvalidTimestamp(String),
    /// `voice_language` is not a `xx` / `xx-YY` locale tag.
    InvalidVoiceLanguage(String),
    /// Journey end fields disagree with its status.
    InconsistentJourneyEnd,
    /// Journey distance is negative or not finite.
    InvalidDistance,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyStartLocation => write!(f, "start location must not be empty"),
            Self::InvalidTimestamp(raw) => write!(f, "invalid date-time `{raw}`"),
            Self::InvalidVoiceLanguage(raw) => write!(f, "invalid voice language `{raw}`"),
            Self::InconsistentJourneyEnd => write!(
                f,
                "journey end_time and end_location must be set together, only when completed"
            ),
            Self::InvalidDistance => write!(f, "journey distance must be a non-negative number"),
        }
    }
}

impl Error for ValidationError {}
