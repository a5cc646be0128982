//! Pending/applied filter values and the order the dialogs apply them in.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, instrument, warn};

use crate::filter::{
    filter_events_by_date, filter_events_by_max_proximity, filter_events_by_price,
    filter_events_by_search, filter_events_by_sort_by, filter_events_by_sport,
    filter_events_by_status, filter_events_by_type,
};
use crate::geo::Geocoder;
use crate::model::{
    EventData, EventStatusFilter, EventTypeFilter, SortByCategory, NO_SPORT_CHOSEN, SYDNEY,
};

/// Price slider value meaning "any price".
pub const PRICE_SLIDER_MAX_VALUE: u64 = 100;
/// Proximity slider value (km) meaning "any distance".
pub const PROXIMITY_SLIDER_MAX_VALUE: u32 = 100;

/// A filter form with values being edited (`pending`) and values in effect.
///
/// Edits go to `pending`; they only take effect when the owner applies them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState<F> {
    pub pending: F,
    applied: F,
}

impl<F: Clone + Default + PartialEq> FilterState<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &F {
        &self.applied
    }

    /// Whether there are edits that have not been applied.
    pub fn is_dirty(&self) -> bool {
        self.pending != self.applied
    }

    /// Reset pending values to their defaults. Applied values are untouched.
    pub fn clear_all(&mut self) {
        self.pending = F::default();
    }

    /// Throw away pending edits.
    pub fn discard(&mut self) {
        self.pending = self.applied.clone();
    }

    fn commit(&mut self) -> F {
        self.applied = self.pending.clone();
        self.applied.clone()
    }
}

/// Filters offered to the public on the event discovery page.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryFilters {
    /// Price ceiling in whole units; [`PRICE_SLIDER_MAX_VALUE`] disables it.
    pub max_price: u64,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Radius in km; [`PROXIMITY_SLIDER_MAX_VALUE`] disables it.
    pub max_proximity_km: u32,
    /// Free-text origin for the radius; empty disables it.
    pub src_location: String,
    pub sport: String,
    pub sort_by: SortByCategory,
}

impl Default for DiscoveryFilters {
    fn default() -> Self {
        Self {
            max_price: PRICE_SLIDER_MAX_VALUE,
            date_range: None,
            max_proximity_km: PROXIMITY_SLIDER_MAX_VALUE,
            src_location: String::new(),
            sport: NO_SPORT_CHOSEN.to_string(),
            sort_by: SortByCategory::default(),
        }
    }
}

/// Filters on an organiser's own event dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganiserFilters {
    pub search: String,
    pub status: EventStatusFilter,
    pub event_type: EventTypeFilter,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub sort_by: SortByCategory,
}

pub type DiscoveryFilterState = FilterState<DiscoveryFilters>;
pub type OrganiserFilterState = FilterState<OrganiserFilters>;

/// Expand a day range to `[first 00:00:00, last 23:59:59]` in UTC.
pub fn day_range_bounds(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_end = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    (
        start.and_time(NaiveTime::MIN).and_utc(),
        end.and_time(day_end).and_utc(),
    )
}

impl FilterState<DiscoveryFilters> {
    /// Apply pending filters to `events`: price, date, proximity, sport, then sort.
    ///
    /// The proximity origin is geocoded from `src_location`; if that fails the
    /// search falls back to Sydney.
    #[instrument(skip_all, fields(count = events.len()))]
    pub async fn apply<G>(&mut self, events: &[EventData], geocoder: &G) -> Vec<EventData>
    where
        G: Geocoder + ?Sized,
    {
        let filters = self.commit();
        let mut filtered = events.to_vec();

        if filters.max_price != PRICE_SLIDER_MAX_VALUE {
            filtered = filter_events_by_price(&filtered, None, filters.max_price);
        }

        if let Some((start, end)) = filters.date_range {
            let (start, end) = day_range_bounds(start, end);
            filtered = filter_events_by_date(&filtered, start, end);
        }

        let any_proximity = filters.src_location.is_empty()
            || filters.max_proximity_km == PROXIMITY_SLIDER_MAX_VALUE;
        if !any_proximity {
            let origin = match geocoder.geocode(&filters.src_location).await {
                Ok(point) => point,
                Err(err) => {
                    warn!(location = %filters.src_location, error = %err, "geocoding failed, using default origin");
                    SYDNEY
                }
            };
            filtered = filter_events_by_max_proximity(
                &filtered,
                f64::from(filters.max_proximity_km),
                origin.lat,
                origin.lng,
            );
        }

        filtered = filter_events_by_sport(&filtered, &filters.sport);
        filtered = filter_events_by_sort_by(&filtered, filters.sort_by);

        debug!(kept = filtered.len(), "applied discovery filters");
        filtered
    }
}

impl FilterState<OrganiserFilters> {
    /// Apply pending filters to `events`: search, status, type, price, date, then sort.
    #[instrument(skip_all, fields(count = events.len()))]
    pub fn apply(&mut self, events: &[EventData]) -> Vec<EventData> {
        let filters = self.commit();
        let mut filtered = filter_events_by_search(events, &filters.search);
        filtered = filter_events_by_status(&filtered, filters.status);
        filtered = filter_events_by_type(&filtered, filters.event_type);

        if filters.min_price.is_some() || filters.max_price.is_some() {
            filtered = filter_events_by_price(
                &filtered,
                filters.min_price,
                filters.max_price.unwrap_or(u64::MAX),
            );
        }

        if let Some((start, end)) = filters.date_range {
            let (start, end) = day_range_bounds(start, end);
            filtered = filter_events_by_date(&filtered, start, end);
        }

        filtered = filter_events_by_sort_by(&filtered, filters.sort_by);

        debug!(kept = filtered.len(), "applied organiser filters");
        filtered
    }
}
