//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod file_key_value_store;
mod headless_map;
mod naver_directions_adapter;
mod naver_geocoding_adapter;
mod naver_search_adapter;
mod static_geolocation;
mod supabase_auth_adapter;

use application::error::ApplicationError;
use integration_naver::NaverError;

pub use file_key_value_store::{FileKeyValueStore, StorageError};
pub use headless_map::{HeadlessMap, HeadlessMapSdk, Polyline};
pub use naver_directions_adapter::NaverDirectionsAdapter;
pub use naver_geocoding_adapter::NaverGeocodingAdapter;
pub use naver_search_adapter::NaverSearchAdapter;
pub use static_geolocation::StaticGeolocation;
pub use supabase_auth_adapter::{SESSION_STORAGE_KEY, SupabaseAuthAdapter};

/// Map a Naver client error to an application error
pub(crate) fn map_naver_error(err: NaverError) -> ApplicationError {
    match err {
        NaverError::Http { status, message } => {
            tracing::debug!(status, %message, "Naver API rejected request");
            ApplicationError::HttpError { status }
        },
        NaverError::NoResult(query) => ApplicationError::NoResult(query),
        NaverError::NoRoute { code, .. } => ApplicationError::NoRoute { code },
        NaverError::Timeout { timeout_secs } => ApplicationError::Timeout { timeout_secs },
        NaverError::ConnectionFailed(e) => ApplicationError::ExternalService(e),
        NaverError::ParseError(e) => {
            ApplicationError::ExternalService(format!("malformed response: {e}"))
        },
        NaverError::ConfigurationError(e) => ApplicationError::Configuration(e),
    }
}
