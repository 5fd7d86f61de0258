//! Application services - Use case implementations

mod auth_store;
mod location_service;
mod map_adapter;
mod place_finder;

pub use auth_store::{AUTH_STORAGE_KEY, AuthOutcome, AuthStore};
pub use location_service::LocationService;
pub use map_adapter::{MapAdapter, MapAdapterConfig, MapController, Readiness};
pub use place_finder::{PageState, PlaceFinder, SearchOutcome};
