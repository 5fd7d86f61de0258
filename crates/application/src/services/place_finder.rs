//! Place finder page workflow
//!
//! Coordinates the search-and-route page: find my position, search places,
//! pick a destination, draw the driving route.

use std::sync::Arc;

use domain::{BlogPost, Coordinate, Place, RouteSummary};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{BlogSearchPort, GeocodingPort, PlaceSearchPort, Position};
use crate::services::location_service::LocationService;
use crate::services::map_adapter::MapController;

/// Result of a search submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank; nothing was sent and prior results remain
    EmptyQuery,
    /// The search matched nothing; prior results and destination remain
    NoResults,
    /// Results replaced the previous list
    Found(usize),
}

/// Page state visible to the presentation layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    /// Last submitted query
    pub query: String,
    /// Results of the last search
    pub places: Vec<Place>,
    /// Last known position of the user
    pub my_position: Option<Position>,
    /// Destination chosen from the results
    pub destination: Option<Coordinate>,
    /// Route currently drawn on the map
    pub route: Option<RouteSummary>,
}

/// Search-and-route page service
pub struct PlaceFinder {
    map: MapController,
    places: Arc<dyn PlaceSearchPort>,
    geocoder: Arc<dyn GeocodingPort>,
    blogs: Arc<dyn BlogSearchPort>,
    location: Arc<LocationService>,
    state: Mutex<PageState>,
}

impl std::fmt::Debug for PlaceFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceFinder")
            .field("map", &self.map)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl PlaceFinder {
    /// Wire the page to its collaborators
    #[must_use]
    pub fn new(
        map: MapController,
        places: Arc<dyn PlaceSearchPort>,
        geocoder: Arc<dyn GeocodingPort>,
        blogs: Arc<dyn BlogSearchPort>,
        location: Arc<LocationService>,
    ) -> Self {
        Self {
            map,
            places,
            geocoder,
            blogs,
            location,
            state: Mutex::new(PageState::default()),
        }
    }

    /// Snapshot of the page state
    #[must_use]
    pub fn state(&self) -> PageState {
        self.state.lock().clone()
    }

    /// The map this page drives
    #[must_use]
    pub const fn map(&self) -> &MapController {
        &self.map
    }

    /// Use `position` as the route start without asking the location provider
    pub fn set_my_position(&self, position: Position) {
        self.state.lock().my_position = Some(position);
    }

    /// Acquire the current position and center the map on it
    ///
    /// Waits for the map to finish loading before moving it.
    ///
    /// # Errors
    ///
    /// Location failures (`Timeout`, provider errors) or `NotReady` if the
    /// map could not be constructed.
    #[instrument(skip(self))]
    pub async fn locate_me(&self) -> Result<Position, ApplicationError> {
        let position = self.location.current_position().await?;
        self.state.lock().my_position = Some(position.clone());

        self.map.ready().await?;
        self.map.move_to(position.coordinate)?;
        info!(coordinate = %position.coordinate, "Centered on current position");
        Ok(position)
    }

    /// Run a place search and show the first located hit on the map
    ///
    /// A new result list drops the previous destination. A search with no
    /// hits leaves the page as it was.
    ///
    /// # Errors
    ///
    /// Propagates search client errors; the previous results are kept.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, ApplicationError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank query");
            return Ok(SearchOutcome::EmptyQuery);
        }

        let places = self.places.search(query).await?;
        if places.is_empty() {
            info!("Search found nothing, keeping previous results");
            return Ok(SearchOutcome::NoResults);
        }
        let count = places.len();
        let first = places.iter().find_map(|p| p.coordinates);

        {
            let mut state = self.state.lock();
            state.query = query.to_string();
            state.places = places;
            state.destination = None;
        }

        if let Some(position) = first {
            if let Err(e) = self.map.move_to(position) {
                debug!(error = %e, "Map not ready, leaving viewport unchanged");
            }
        }

        info!(count, "Search completed");
        Ok(SearchOutcome::Found(count))
    }

    /// Make the place at `index` the destination and move the map to it
    ///
    /// Places without coordinates are resolved by geocoding their road
    /// address first. A place whose delivered position was malformed is
    /// rejected and the map stays where it is.
    ///
    /// # Errors
    ///
    /// `Validation` for an out-of-range index or a place with no address,
    /// `ExternalService` for a malformed position, geocoding errors, or
    /// `NotReady` before the map exists.
    #[instrument(skip(self))]
    pub async fn select_place(&self, index: usize) -> Result<Coordinate, ApplicationError> {
        let place = self
            .state
            .lock()
            .places
            .get(index)
            .cloned()
            .ok_or_else(|| ApplicationError::Validation(format!("no search result at index {index}")))?;

        let coordinate = match (place.coordinates, &place.position_error) {
            (Some(c), _) => c,
            (None, Some(reason)) => {
                warn!(title = %place.display_title(), %reason, "Refusing malformed position");
                return Err(ApplicationError::ExternalService(format!(
                    "search result '{}' has a malformed position: {reason}",
                    place.display_title()
                )));
            },
            (None, None) => self.resolve(&place).await?,
        };

        self.map.move_to(coordinate)?;

        let mut state = self.state.lock();
        if let Some(slot) = state.places.get_mut(index) {
            if slot.title == place.title && slot.coordinates.is_none() {
                slot.coordinates = Some(coordinate);
            }
        }
        state.destination = Some(coordinate);
        debug!(title = %place.display_title(), %coordinate, "Destination selected");
        Ok(coordinate)
    }

    async fn resolve(&self, place: &Place) -> Result<Coordinate, ApplicationError> {
        if place.road_address.trim().is_empty() {
            return Err(ApplicationError::Validation(format!(
                "'{}' has no address to locate",
                place.display_title()
            )));
        }
        debug!(address = %place.road_address, "Geocoding place without coordinates");
        Ok(self.geocoder.geocode(&place.road_address).await?.coordinate)
    }

    /// Draw the driving route from the current position to the destination
    ///
    /// # Errors
    ///
    /// `Validation` when either end is missing, otherwise whatever
    /// [`MapController::route_to`] reports.
    #[instrument(skip(self))]
    pub async fn request_route(&self) -> Result<RouteSummary, ApplicationError> {
        let (start, goal) = {
            let mut state = self.state.lock();
            let start = state.my_position.as_ref().map(|p| p.coordinate);
            let goal = state.destination;
            let (Some(start), Some(goal)) = (start, goal) else {
                return Err(ApplicationError::Validation(
                    "a current position and a destination are both required".to_string(),
                ));
            };
            state.route = None;
            (start, goal)
        };

        let summary = self
            .map
            .route_to(start, goal, |stats| {
                debug!(distance_m = stats.distance, duration_s = stats.duration, "Route ready");
            })
            .await
            .inspect_err(|e| warn!(error = %e, "Route request failed"))?;

        self.state.lock().route = Some(summary.clone());
        Ok(summary)
    }

    /// Search blog posts about a place
    ///
    /// # Errors
    ///
    /// `Validation` for a blank query, otherwise client errors.
    #[instrument(skip(self))]
    pub async fn search_blogs(&self, query: &str) -> Result<Vec<BlogPost>, ApplicationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApplicationError::Validation("query must not be empty".to_string()));
        }
        self.blogs.search_blogs(query).await
    }
}
