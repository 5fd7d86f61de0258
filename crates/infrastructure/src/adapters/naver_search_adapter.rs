//! Place and blog search adapter - Implements PlaceSearchPort and BlogSearchPort using integration_naver

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{BlogSearchPort, PlaceSearchPort};
use async_trait::async_trait;
use domain::{BlogPost, Coordinate, Place};
use integration_naver::{
    BlogItem, BlogSearchClient, LocalSearchClient, LocalSearchItem, NaverConfig, NaverSearchClient,
};
use tracing::{debug, instrument, warn};

use super::map_naver_error;

/// Adapter for place and blog search
pub struct NaverSearchAdapter {
    places: Arc<dyn LocalSearchClient>,
    blogs: Arc<dyn BlogSearchClient>,
}

impl std::fmt::Debug for NaverSearchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverSearchAdapter")
            .field("client", &"NaverSearchClient")
            .finish()
    }
}

impl NaverSearchAdapter {
    /// Create an adapter backed by the Naver search API
    ///
    /// # Errors
    ///
    /// Returns an error if the search credentials are missing.
    pub fn new(config: &NaverConfig) -> Result<Self, ApplicationError> {
        let client = Arc::new(NaverSearchClient::new(config).map_err(map_naver_error)?);
        Ok(Self {
            places: client.clone(),
            blogs: client,
        })
    }

    /// Create an adapter from existing clients
    #[must_use]
    pub fn with_clients(
        places: Arc<dyn LocalSearchClient>,
        blogs: Arc<dyn BlogSearchClient>,
    ) -> Self {
        Self { places, blogs }
    }

    /// Convert a raw search item, decoding its fixed-point position
    ///
    /// An undecodable position is recorded on the place instead of being
    /// treated as absent.
    fn to_place(item: LocalSearchItem) -> Place {
        let (coordinates, position_error) = if item.has_position() {
            match Coordinate::from_fixed_point(&item.mapx, &item.mapy) {
                Ok(c) => (Some(c), None),
                Err(e) => {
                    warn!(title = %item.title, error = %e, "Search result has a malformed position");
                    (None, Some(e.to_string()))
                },
            }
        } else {
            (None, None)
        };

        let road_address = if item.road_address.is_empty() {
            item.address
        } else {
            item.road_address
        };

        Place {
            title: item.title,
            road_address,
            telephone: item.telephone,
            link: item.link,
            coordinates,
            position_error,
        }
    }

    fn to_blog_post(item: BlogItem) -> BlogPost {
        BlogPost {
            title: item.title,
            link: item.link,
            description: item.description,
            blogger_name: item.bloggername,
            post_date: (!item.postdate.is_empty()).then_some(item.postdate),
        }
    }
}

#[async_trait]
impl PlaceSearchPort for NaverSearchAdapter {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Place>, ApplicationError> {
        let items = self
            .places
            .search_local(query)
            .await
            .map_err(map_naver_error)?;
        let places: Vec<Place> = items.into_iter().map(Self::to_place).collect();
        debug!(
            count = places.len(),
            located = places.iter().filter(|p| p.has_coordinates()).count(),
            malformed = places.iter().filter(|p| p.has_malformed_position()).count(),
            "Places found"
        );
        Ok(places)
    }
}

#[async_trait]
impl BlogSearchPort for NaverSearchAdapter {
    #[instrument(skip(self))]
    async fn search_blogs(&self, query: &str) -> Result<Vec<BlogPost>, ApplicationError> {
        let items = self
            .blogs
            .search_blogs(query)
            .await
            .map_err(map_naver_error)?;
        Ok(items.into_iter().map(Self::to_blog_post).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(mapx: &str, mapy: &str) -> LocalSearchItem {
        LocalSearchItem {
            title: "<b>강남구청</b>".to_string(),
            road_address: "서울특별시 강남구 학동로 426".to_string(),
            address: "서울특별시 강남구 삼성동 16-1".to_string(),
            mapx: mapx.to_string(),
            mapy: mapy.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn decodes_fixed_point_position() {
        let place = NaverSearchAdapter::to_place(item("1270234567", "375234567"));
        let c = place.coordinates.unwrap();
        assert!((c.lat() - 37.523_456_7).abs() < 1e-9);
        assert!((c.lng() - 127.023_456_7).abs() < 1e-9);
        assert_eq!(place.display_title(), "강남구청");
    }

    #[test]
    fn missing_position_leaves_coordinates_empty() {
        let place = NaverSearchAdapter::to_place(item("", ""));
        assert!(!place.has_coordinates());
    }

    #[test]
    fn invalid_position_is_recorded() {
        let place = NaverSearchAdapter::to_place(item("12702x4567", "375234567"));
        assert!(!place.has_coordinates());
        assert!(place.has_malformed_position());
        assert!(place.position_error.unwrap().contains("12702x4567"));
    }

    #[test]
    fn missing_position_is_not_malformed() {
        let place = NaverSearchAdapter::to_place(item("", ""));
        assert!(!place.has_malformed_position());
    }

    #[test]
    fn falls_back_to_lot_number_address() {
        let mut raw = item("", "");
        raw.road_address.clear();
        let place = NaverSearchAdapter::to_place(raw);
        assert_eq!(place.road_address, "서울특별시 강남구 삼성동 16-1");
    }

    #[test]
    fn blog_post_without_date() {
        let post = NaverSearchAdapter::to_blog_post(BlogItem {
            title: "t".into(),
            ..Default::default()
        });
        assert!(post.post_date.is_none());
    }
}
