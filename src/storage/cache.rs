use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::EventData;
use crate::storage::KeyValueStore;

pub const EVENTS_DATA_KEY: &str = "eventsData";
pub const LAST_FETCHED_EVENT_DATA_KEY: &str = "lastFetchedEventData";
/// How long a fetched event list stays fresh, in milliseconds.
pub const EVENTS_REFRESH_MILLIS: i64 = 5 * 60 * 1000;

/// Time-boxed cache of the last fetched event list.
#[derive(Debug)]
pub struct EventCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> EventCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ttl: Duration::milliseconds(EVENTS_REFRESH_MILLIS),
        }
    }

    /// Cached events, if both entries exist and were written less than five
    /// minutes before `now`. Unreadable entries count as a miss.
    pub fn try_get(&self, now: DateTime<Utc>) -> Option<Vec<EventData>> {
        let last_fetched = self.store.get(LAST_FETCHED_EVENT_DATA_KEY)?;
        let data = self.store.get(EVENTS_DATA_KEY)?;

        let Ok(last_fetched) = last_fetched.parse::<i64>() else {
            warn!(value = %last_fetched, "ignoring unreadable cache timestamp");
            return None;
        };
        if now.timestamp_millis() - last_fetched >= self.ttl.num_milliseconds() {
            debug!(age_ms = now.timestamp_millis() - last_fetched, "event cache expired");
            return None;
        }

        match serde_json::from_str::<Vec<EventData>>(&data) {
            Ok(events) => {
                debug!(count = events.len(), "event cache hit");
                Some(events)
            }
            Err(err) => {
                warn!(error = %err, "ignoring unreadable cached events");
                None
            }
        }
    }

    pub fn store(&self, events: &[EventData], now: DateTime<Utc>) -> Result<()> {
        self.store
            .set(EVENTS_DATA_KEY, &serde_json::to_string(events)?)?;
        self.store.set(
            LAST_FETCHED_EVENT_DATA_KEY,
            &now.timestamp_millis().to_string(),
        )
    }

    pub fn invalidate(&self) -> Result<()> {
        self.store.remove(LAST_FETCHED_EVENT_DATA_KEY)?;
        self.store.remove(EVENTS_DATA_KEY)
    }
}
