use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Sport value meaning "no sport selected".
pub const NO_SPORT_CHOSEN: &str = "";

/// Ordering applied to an event list, labelled as in the filter dialogs.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum SortByCategory {
    #[default]
    #[strum(serialize = "Hot")]
    Hot,
    #[strum(serialize = "Top Rated")]
    TopRated,
    #[strum(serialize = "Price Ascending")]
    PriceAscending,
    #[strum(serialize = "Price Descending")]
    PriceDescending,
    #[strum(serialize = "Date Ascending")]
    DateAscending,
    #[strum(serialize = "Date Descending")]
    DateDescending,
}

/// Organiser filter on whether an event is still running.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum EventStatusFilter {
    #[default]
    #[strum(serialize = "")]
    Any,
    Past,
    Future,
}

/// Organiser filter on event visibility.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum EventTypeFilter {
    #[default]
    #[strum(serialize = "")]
    Any,
    Private,
    Public,
}
