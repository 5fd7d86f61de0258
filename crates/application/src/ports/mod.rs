//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod auth_provider_port;
mod directions_port;
mod geocoding_port;
mod geolocation_port;
mod key_value_store;
mod map_port;
mod place_search_port;

#[cfg(test)]
pub use auth_provider_port::MockAuthProviderPort;
pub use auth_provider_port::{AuthEvent, AuthProviderPort, OAuthProvider};
#[cfg(test)]
pub use directions_port::MockDirectionsPort;
pub use directions_port::DirectionsPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::{GeocodedAddress, GeocodingPort};
#[cfg(test)]
pub use geolocation_port::MockGeolocationPort;
pub use geolocation_port::{GeolocationPort, Position, PositionOptions};
#[cfg(test)]
pub use key_value_store::MockKeyValueStorePort;
pub use key_value_store::KeyValueStorePort;
pub use map_port::{MapOptions, MapSdk, MapSurface, MarkerId, OverlayId, PolylineStyle};
#[cfg(test)]
pub use map_port::{MockMapSdk, MockMapSurface};
#[cfg(test)]
pub use place_search_port::{MockBlogSearchPort, MockPlaceSearchPort};
pub use place_search_port::{BlogSearchPort, PlaceSearchPort};
