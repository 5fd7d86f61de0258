//! Logging initialization
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and either
//! human-readable or JSON output.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_telemetry};
