//! Manual journey scheduling and journey log access.

use crate::model::journey::Journey;
use crate::model::timestamp::Timestamp;
use crate::model::validation::ValidationError;
use crate::repo::collection::RecordCollection;
use crate::repo::views::{visible_journeys, JourneyQuery};
use crate::store::KeyValueStore;

/// Scheduling form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyDraft {
    pub title: String,
    pub start_time: Timestamp,
    pub start_location: String,
    pub destination: String,
}

pub struct JourneyService<'s> {
    journeys: RecordCollection<'s, Journey>,
}

impl<'s> JourneyService<'s> {
    pub fn new(store: &'s dyn KeyValueStore) -> Self {
        Self {
            journeys: RecordCollection::new(store),
        }
    }

    /// Records an upcoming, manually scheduled journey.
    ///
    /// Blank title or start location is rejected before any write.
    pub fn schedule(&self, draft: JourneyDraft) -> Result<Journey, ValidationError> {
        let mut journey = Journey::upcoming(
            draft.title.trim(),
            draft.start_time,
            draft.start_location.trim(),
        );
        journey.planned_destination =
            Some(draft.destination.trim().to_string()).filter(|d| !d.is_empty());
        journey.validate()?;
        Ok(self.journeys.create(journey))
    }

    pub fn delete(&self, id: &str) -> bool {
        self.journeys.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Journey> {
        self.journeys.get(id)
    }

    pub fn all(&self) -> Vec<Journey> {
        self.journeys.all()
    }

    pub fn list(&self, query: &JourneyQuery) -> Vec<Journey> {
        visible_journeys(&self.journeys, query)
    }
}
