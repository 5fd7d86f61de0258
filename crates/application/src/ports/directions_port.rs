//! Driving directions port

use async_trait::async_trait;
use domain::{Coordinate, RouteSummary};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for driving directions between two points
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectionsPort: Send + Sync {
    /// Fetch the recommended route from `start` to `goal`
    ///
    /// The returned path is in (lat, lng) order. Fails with `NoRoute` when
    /// the provider reports no viable route.
    async fn route(
        &self,
        start: &Coordinate,
        goal: &Coordinate,
    ) -> Result<RouteSummary, ApplicationError>;
}
