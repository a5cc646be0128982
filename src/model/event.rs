use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::timestamp;

/// Firestore document id of an event.
pub type EventId = String;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Fallback search origin when a location cannot be geocoded.
pub const SYDNEY: LatLng = LatLng::new(-33.8688, 151.2093);

/// A bookable sports event as stored in the `Events` collection.
///
/// Deserialization is strict: required fields must be present with the right
/// shape, timestamps must use the `{seconds, nanoseconds}` encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    #[serde(default)]
    pub event_id: EventId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub organiser_id: String,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub registration_deadline: DateTime<Utc>,
    pub location: String,
    pub location_lat_lng: LatLng,
    /// Ticket price in cents.
    pub price: u64,
    pub capacity: u32,
    pub vacancy: u32,
    pub sport: String,
    #[serde(default)]
    pub event_tags: Vec<String>,
    pub is_active: bool,
    pub is_private: bool,
    #[serde(default)]
    pub access_count: u64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub name_tokens: Vec<String>,
    #[serde(default)]
    pub location_tokens: Vec<String>,
}

impl EventData {
    /// Number of tickets already taken.
    pub fn tickets_sold(&self) -> u32 {
        self.capacity.saturating_sub(self.vacancy)
    }

    /// Fraction of capacity sold, in `[0, 1]`. Events without capacity count as unsold.
    pub fn fraction_sold(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        f64::from(self.tickets_sold()) / f64::from(self.capacity)
    }

    /// Recompute `name_tokens` and `location_tokens` from `name` and `location`.
    pub fn with_search_tokens(mut self) -> Self {
        self.name_tokens = tokenize_text(&self.name);
        self.location_tokens = tokenize_text(&self.location);
        self
    }

    pub fn status(&self) -> EventStatus {
        if self.is_active {
            EventStatus::Active
        } else {
            EventStatus::Inactive
        }
    }

    pub fn privacy(&self) -> EventPrivacy {
        if self.is_private {
            EventPrivacy::Private
        } else {
            EventPrivacy::Public
        }
    }

    /// Subcollection this event currently lives in, e.g. `Events/Active/Public`.
    pub fn collection_path(&self) -> String {
        event_collection_path(self.status(), self.privacy())
    }

    /// Soft delete: the event moves to the `Inactive` subcollection.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Lifecycle half of an event's storage path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum EventStatus {
    Active,
    Inactive,
}

/// Visibility half of an event's storage path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum EventPrivacy {
    Public,
    Private,
}

pub fn event_collection_path(status: EventStatus, privacy: EventPrivacy) -> String {
    format!("Events/{status}/{privacy}")
}

/// Lower-case `text` and split it on whitespace into search tokens.
pub fn tokenize_text(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}
