//! Application layer - Use cases and orchestration
//!
//! Port definitions for the map widget, search and auth providers, and the
//! services that drive them: the map adapter, the place finder page and the
//! auth store.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
