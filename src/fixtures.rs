//! Shared builders for unit tests.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{EventData, LatLng, SYDNEY};

/// Date at 10:00 UTC, from `YYYY-MM-DD`.
pub(crate) fn at(date: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
        .and_utc()
}

/// Public, active event in Sydney starting on `date`, priced in cents.
pub(crate) fn event(id: &str, price: u64, date: &str) -> EventData {
    let start = at(date);
    EventData {
        event_id: id.to_string(),
        name: format!("Event {id}"),
        description: String::new(),
        organiser_id: "organiser".to_string(),
        start_date: start,
        end_date: start + chrono::Duration::hours(2),
        registration_deadline: start - chrono::Duration::hours(1),
        location: "Sydney NSW".to_string(),
        location_lat_lng: SYDNEY,
        price,
        capacity: 10,
        vacancy: 10,
        sport: "volleyball".to_string(),
        event_tags: vec![],
        is_active: true,
        is_private: false,
        access_count: 0,
        image: String::new(),
        name_tokens: vec![],
        location_tokens: vec![],
    }
}

pub(crate) fn event_at(id: &str, point: LatLng) -> EventData {
    EventData {
        location_lat_lng: point,
        ..event(id, 0, "2024-01-01")
    }
}

pub(crate) fn ids(events: &[EventData]) -> Vec<&str> {
    events.iter().map(|e| e.event_id.as_str()).collect()
}
