//! Client-side filtering and sorting of event lists.
//!
//! Every function takes the current list by reference and returns a new
//! vector; inputs are never modified. The filter dialogs chain these in a
//! fixed order, see [`state`].

pub mod state;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::geo::get_distance_between_two_coords;
use crate::model::{
    EventData, EventStatusFilter, EventTypeFilter, LatLng, SortByCategory, NO_SPORT_CHOSEN,
};

/// Cents per whole currency unit; price bounds are given in whole units.
const CENTS: u64 = 100;

/// Keep events priced within `[min_price, max_price]` (whole units, inclusive).
/// Without a minimum only the ceiling applies.
pub fn filter_events_by_price(
    events: &[EventData],
    min_price: Option<u64>,
    max_price: u64,
) -> Vec<EventData> {
    let floor = min_price.map_or(0, |min| min.saturating_mul(CENTS));
    let ceiling = max_price.saturating_mul(CENTS);
    events
        .iter()
        .filter(|e| e.price >= floor && e.price <= ceiling)
        .cloned()
        .collect()
}

/// Keep events starting within `[start, end]`, compared at millisecond precision.
pub fn filter_events_by_date(
    events: &[EventData],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<EventData> {
    let (start, end) = (start.timestamp_millis(), end.timestamp_millis());
    events
        .iter()
        .filter(|e| {
            let millis = e.start_date.timestamp_millis();
            millis >= start && millis <= end
        })
        .cloned()
        .collect()
}

/// Keep events strictly closer than `max_proximity_km` to the source point.
pub fn filter_events_by_max_proximity(
    events: &[EventData],
    max_proximity_km: f64,
    src_lat: f64,
    src_lng: f64,
) -> Vec<EventData> {
    let source = LatLng::new(src_lat, src_lng);
    events
        .iter()
        .filter(|e| {
            get_distance_between_two_coords(e.location_lat_lng, source) < max_proximity_km
        })
        .cloned()
        .collect()
}

/// Keep events of exactly `sport`; [`NO_SPORT_CHOSEN`] keeps everything.
pub fn filter_events_by_sport(events: &[EventData], sport: &str) -> Vec<EventData> {
    if sport == NO_SPORT_CHOSEN {
        return events.to_vec();
    }
    events.iter().filter(|e| e.sport == sport).cloned().collect()
}

/// Case-insensitive substring match on name or location. Empty query keeps everything.
pub fn filter_events_by_search(events: &[EventData], query: &str) -> Vec<EventData> {
    if query.is_empty() {
        return events.to_vec();
    }
    let needle = query.to_lowercase();
    events
        .iter()
        .filter(|e| {
            e.name.to_lowercase().contains(&needle) || e.location.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn filter_events_by_status(
    events: &[EventData],
    status: EventStatusFilter,
) -> Vec<EventData> {
    events
        .iter()
        .filter(|e| match status {
            EventStatusFilter::Any => true,
            EventStatusFilter::Past => !e.is_active,
            EventStatusFilter::Future => e.is_active,
        })
        .cloned()
        .collect()
}

pub fn filter_events_by_type(
    events: &[EventData],
    event_type: EventTypeFilter,
) -> Vec<EventData> {
    events
        .iter()
        .filter(|e| match event_type {
            EventTypeFilter::Any => true,
            EventTypeFilter::Private => e.is_private,
            EventTypeFilter::Public => !e.is_private,
        })
        .cloned()
        .collect()
}

/// Sort a copy of `events` by `category`. `TopRated` also drops events that
/// have already started.
pub fn filter_events_by_sort_by(
    events: &[EventData],
    category: SortByCategory,
) -> Vec<EventData> {
    filter_events_by_sort_by_at(events, category, Utc::now())
}

/// [`filter_events_by_sort_by`] with an explicit current time.
pub fn filter_events_by_sort_by_at(
    events: &[EventData],
    category: SortByCategory,
    now: DateTime<Utc>,
) -> Vec<EventData> {
    let mut sorted = events.to_vec();
    match category {
        SortByCategory::Hot => {
            let scores = hotness_scores(&sorted);
            let mut scored: Vec<(f64, EventData)> = scores.into_iter().zip(sorted).collect();
            scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
            sorted = scored.into_iter().map(|(_, e)| e).collect();
        }
        SortByCategory::TopRated => {
            sorted.retain(|e| e.start_date > now);
            sorted.sort_by(|a, b| b.access_count.cmp(&a.access_count));
        }
        SortByCategory::PriceAscending => sorted.sort_by_key(|e| e.price),
        SortByCategory::PriceDescending => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortByCategory::DateAscending => sorted.sort_by_key(|e| e.start_date.timestamp_millis()),
        SortByCategory::DateDescending => sorted.sort_by(|a, b| {
            b.start_date
                .timestamp_millis()
                .cmp(&a.start_date.timestamp_millis())
        }),
    }
    debug!(%category, count = sorted.len(), "sorted events");
    sorted
}

/// Hotness of each event in `[0, 1]`: the mean of access count and tickets
/// sold (each relative to the list maximum) and the fraction of capacity sold.
pub fn hotness_scores(events: &[EventData]) -> Vec<f64> {
    let max_access = events.iter().map(|e| e.access_count).max().unwrap_or(0);
    let max_sold = events.iter().map(|e| e.tickets_sold()).max().unwrap_or(0);

    events
        .iter()
        .map(|e| {
            let access = ratio(e.access_count as f64, max_access as f64);
            let sold = ratio(f64::from(e.tickets_sold()), f64::from(max_sold));
            (access + sold + e.fraction_sold()) / 3.0
        })
        .collect()
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::fixtures::{at, event, event_at, ids};
    use crate::model::SYDNEY;

    fn abc() -> Vec<EventData> {
        vec![
            event("A", 10, "2024-01-01"),
            event("B", 30, "2024-01-05"),
            event("C", 20, "2024-01-03"),
        ]
    }

    #[test]
    fn test_price_ascending_example() {
        let sorted = filter_events_by_sort_by(&abc(), SortByCategory::PriceAscending);
        assert_eq!(ids(&sorted), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_date_descending_example() {
        let sorted = filter_events_by_sort_by(&abc(), SortByCategory::DateDescending);
        assert_eq!(ids(&sorted), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_price_descending_and_date_ascending() {
        let events = abc();
        assert_eq!(
            ids(&filter_events_by_sort_by(&events, SortByCategory::PriceDescending)),
            vec!["B", "C", "A"]
        );
        assert_eq!(
            ids(&filter_events_by_sort_by(&events, SortByCategory::DateAscending)),
            vec!["A", "C", "B"]
        );
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let events = abc();
        let before = events.clone();
        let _ = filter_events_by_sort_by(&events, SortByCategory::PriceDescending);
        assert_eq!(events, before);
    }

    #[test]
    fn test_top_rated_keeps_future_events_by_access_count() {
        let mut past = event("past", 0, "2024-01-01");
        past.access_count = 1_000;
        let mut quiet = event("quiet", 0, "2024-03-01");
        quiet.access_count = 3;
        let mut busy = event("busy", 0, "2024-02-01");
        busy.access_count = 50;

        let sorted = filter_events_by_sort_by_at(
            &[past, quiet, busy],
            SortByCategory::TopRated,
            at("2024-01-15"),
        );
        assert_eq!(ids(&sorted), vec!["busy", "quiet"]);
    }

    #[test]
    fn test_hot_weighs_views_sales_and_fill_rate() {
        let mut viewed = event("viewed", 0, "2024-01-01");
        viewed.access_count = 100;
        viewed.capacity = 100;
        viewed.vacancy = 100;

        let mut full = event("full", 0, "2024-01-01");
        full.access_count = 50;
        full.capacity = 20;
        full.vacancy = 0;

        let cold = event("cold", 0, "2024-01-01");

        let sorted = filter_events_by_sort_by(&[cold, viewed, full], SortByCategory::Hot);
        assert_eq!(ids(&sorted), vec!["full", "viewed", "cold"]);
    }

    #[test]
    fn test_hot_survives_zero_capacity() {
        let mut empty = event("empty", 0, "2024-01-01");
        empty.capacity = 0;
        empty.vacancy = 0;
        empty.access_count = 5;
        let plain = event("plain", 0, "2024-01-01");

        let scores = hotness_scores(&[empty.clone(), plain.clone()]);
        assert!(scores.iter().all(|s| s.is_finite()));

        let sorted = filter_events_by_sort_by(&[plain, empty], SortByCategory::Hot);
        assert_eq!(ids(&sorted), vec!["empty", "plain"]);
    }

    #[test]
    fn test_hot_ties_keep_input_order() {
        let events = abc();
        let sorted = filter_events_by_sort_by(&events, SortByCategory::Hot);
        assert_eq!(ids(&sorted), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_price_filter_without_minimum() {
        let events = vec![
            event("free", 0, "2024-01-01"),
            event("ten", 1_000, "2024-01-01"),
            event("eleven", 1_100, "2024-01-01"),
        ];
        assert_eq!(
            ids(&filter_events_by_price(&events, None, 10)),
            vec!["free", "ten"]
        );
        assert_eq!(
            ids(&filter_events_by_price(&events, Some(5), 11)),
            vec!["ten", "eleven"]
        );
    }

    #[test]
    fn test_date_filter_is_inclusive() {
        let events = abc();
        let kept = filter_events_by_date(&events, at("2024-01-01"), at("2024-01-03"));
        assert_eq!(ids(&kept), vec!["A", "C"]);
    }

    #[test]
    fn test_date_filter_is_idempotent() {
        let events = abc();
        let (start, end) = (at("2024-01-02"), at("2024-01-06"));
        let once = filter_events_by_date(&events, start, end);
        let twice = filter_events_by_date(&once, start, end);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_proximity_includes_event_at_source() {
        let events = vec![event_at("here", SYDNEY)];
        let kept = filter_events_by_max_proximity(&events, 0.001, SYDNEY.lat, SYDNEY.lng);
        assert_eq!(ids(&kept), vec!["here"]);
    }

    #[test]
    fn test_proximity_is_strict() {
        let newcastle = LatLng::new(-32.9283, 151.7817);
        let events = vec![event_at("here", SYDNEY), event_at("newcastle", newcastle)];
        let distance = get_distance_between_two_coords(newcastle, SYDNEY);

        let kept = filter_events_by_max_proximity(&events, distance, SYDNEY.lat, SYDNEY.lng);
        assert_eq!(ids(&kept), vec!["here"]);

        let kept =
            filter_events_by_max_proximity(&events, distance + 1.0, SYDNEY.lat, SYDNEY.lng);
        assert_eq!(ids(&kept), vec!["here", "newcastle"]);
    }

    #[test]
    fn test_sport_sentinel_keeps_everything() {
        let mut events = abc();
        events[1].sport = "futsal".to_string();
        assert_eq!(filter_events_by_sport(&events, NO_SPORT_CHOSEN), events);
        assert_eq!(ids(&filter_events_by_sport(&events, "futsal")), vec!["B"]);
        assert!(filter_events_by_sport(&events, "Futsal").is_empty());
    }

    #[test]
    fn test_search_matches_name_or_location() {
        let mut events = abc();
        events[0].name = "Beach Volleyball".to_string();
        events[1].location = "Bondi BEACH".to_string();
        let kept = filter_events_by_search(&events, "beach");
        assert_eq!(ids(&kept), vec!["A", "B"]);
        assert_eq!(filter_events_by_search(&events, "").len(), 3);
    }

    #[test]
    fn test_status_and_type_filters() {
        let mut events = abc();
        events[0].is_active = false;
        events[1].is_private = true;

        assert_eq!(
            ids(&filter_events_by_status(&events, EventStatusFilter::Past)),
            vec!["A"]
        );
        assert_eq!(
            ids(&filter_events_by_status(&events, EventStatusFilter::Future)),
            vec!["B", "C"]
        );
        assert_eq!(
            ids(&filter_events_by_type(&events, EventTypeFilter::Private)),
            vec!["B"]
        );
        assert_eq!(
            ids(&filter_events_by_type(&events, EventTypeFilter::Public)),
            vec!["A", "C"]
        );
        assert_eq!(filter_events_by_type(&events, EventTypeFilter::Any), events);
    }

    fn priced(prices: &[u64]) -> Vec<EventData> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| event(&i.to_string(), *p, "2024-01-01"))
            .collect()
    }

    proptest! {
        #[test]
        fn prop_price_filter_respects_bounds(
            prices in prop::collection::vec(0u64..20_000, 0..40),
            min in 0u64..100,
            max in 0u64..200,
        ) {
            let events = priced(&prices);
            let kept = filter_events_by_price(&events, Some(min), max);
            prop_assert!(kept.iter().all(|e| min * 100 <= e.price && e.price <= max * 100));
            let expected = prices.iter().filter(|p| min * 100 <= **p && **p <= max * 100).count();
            prop_assert_eq!(kept.len(), expected);
        }

        #[test]
        fn prop_price_ascending_is_non_decreasing(prices in prop::collection::vec(0u64..20_000, 0..40)) {
            let sorted = filter_events_by_sort_by(&priced(&prices), SortByCategory::PriceAscending);
            prop_assert!(sorted.windows(2).all(|w| w[0].price <= w[1].price));
            prop_assert_eq!(sorted.len(), prices.len());
        }

        #[test]
        fn prop_date_filter_respects_bounds_and_is_idempotent(
            offsets in prop::collection::vec(0i64..60 * 24 * 60, 0..40),
            start in 0i64..60 * 24 * 60,
            span in 0i64..30 * 24 * 60,
        ) {
            let base = at("2024-01-01");
            let events: Vec<EventData> = offsets
                .iter()
                .enumerate()
                .map(|(i, minutes)| EventData {
                    start_date: base + chrono::Duration::minutes(*minutes),
                    ..event(&i.to_string(), 0, "2024-01-01")
                })
                .collect();
            let from = base + chrono::Duration::minutes(start);
            let to = from + chrono::Duration::minutes(span);

            let kept = filter_events_by_date(&events, from, to);
            prop_assert!(kept.iter().all(|e| from <= e.start_date && e.start_date <= to));
            let expected = events
                .iter()
                .filter(|e| from <= e.start_date && e.start_date <= to)
                .count();
            prop_assert_eq!(kept.len(), expected);
            prop_assert_eq!(filter_events_by_date(&kept, from, to), kept);
        }

        #[test]
        fn prop_date_descending_is_non_increasing(days in prop::collection::vec(1u32..28, 0..30)) {
            let events: Vec<EventData> = days
                .iter()
                .enumerate()
                .map(|(i, d)| event(&i.to_string(), 0, &format!("2024-02-{d:02}")))
                .collect();
            let sorted = filter_events_by_sort_by(&events, SortByCategory::DateDescending);
            prop_assert!(sorted.windows(2).all(|w| w[0].start_date >= w[1].start_date));
        }

        #[test]
        fn prop_hot_scores_stay_in_unit_range(
            stats in prop::collection::vec((0u64..10_000, 0u32..200, 0u32..200), 0..30),
        ) {
            let events: Vec<EventData> = stats
                .iter()
                .enumerate()
                .map(|(i, (views, capacity, vacancy))| EventData {
                    access_count: *views,
                    capacity: *capacity,
                    vacancy: *vacancy,
                    ..event(&i.to_string(), 0, "2024-01-01")
                })
                .collect();
            for score in hotness_scores(&events) {
                prop_assert!((0.0..=1.0).contains(&score));
            }
        }
    }
}
