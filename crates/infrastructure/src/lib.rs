//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Naver search,
//! geocoding and directions APIs, the Supabase auth service, the local
//! storage directory, a headless map widget and a fixed-position
//! geolocation source. Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, ENV_PREFIX, FixedPositionConfig, GeolocationAppConfig, MapAppConfig, StorageConfig,
};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
