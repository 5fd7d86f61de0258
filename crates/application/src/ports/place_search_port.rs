//! Place search port
//!
//! Keyword search over the local-business directory. Adapters return places
//! in provider order; coordinates are already decoded to degrees when the
//! provider supplied them.

use async_trait::async_trait;
use domain::{BlogPost, Place};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for place search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlaceSearchPort: Send + Sync {
    /// Search places by keyword
    ///
    /// The caller guarantees a non-empty query.
    async fn search(&self, query: &str) -> Result<Vec<Place>, ApplicationError>;
}

/// Port for blog search, shown alongside place results
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlogSearchPort: Send + Sync {
    /// Search blog posts by keyword
    async fn search_blogs(&self, query: &str) -> Result<Vec<BlogPost>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PlaceSearchPort>();
        assert_send_sync::<dyn BlogSearchPort>();
    }
}
