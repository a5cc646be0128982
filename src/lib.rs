//! Core logic of the SportsHub platform.
//!
//! - [`filter`]: the event filter and sort pipeline behind the discovery and
//!   organiser dashboards, and the pending/applied filter state.
//! - [`storage`]: key/value stores with the event list cache and the
//!   operation rate limiter built on them.
//! - [`JiraClient`], [`OpenRouterClient`], [`website`], [`leads`] and
//!   [`config`]: the pieces of the `sportshub` lead-tracking CLI.

pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub(crate) mod http;
pub mod jira;
pub mod leads;
pub mod model;
pub mod openrouter;
pub mod storage;
pub mod website;

#[cfg(test)]
mod fixtures;

pub use config::{CliConfig, ConfigManager};
pub use error::{Result, SportsHubError};
pub use filter::state::{
    DiscoveryFilterState, DiscoveryFilters, FilterState, OrganiserFilterState, OrganiserFilters,
};
pub use geo::{get_distance_between_two_coords, Geocoder, GoogleGeocoder};
pub use jira::{CreateIssueRequest, JiraClient};
pub use model::*;
pub use openrouter::OpenRouterClient;
pub use storage::{EventCache, JsonFileStore, KeyValueStore, MemoryStore, RateLimiter};
