//! Domain layer for PlaceFinder
//!
//! Contains the value objects and entities shared by every other crate:
//! coordinates, places, route summaries and session state.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod markup;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
