//! Map adapter
//!
//! Bridges page state to an imperative map widget whose toolkit loads
//! asynchronously. The adapter owns the single map instance, the tracked
//! marker set and the current route overlay; callers receive a
//! [`MapController`] capability and never touch the widget directly.
//!
//! # Lifecycle
//!
//! 1. [`MapAdapter::initialize`] spawns a readiness poll that checks the
//!    toolkit every `poll_interval` (100ms by default) and constructs the map
//!    exactly once.
//! 2. Operations issued before construction fail fast with
//!    [`ApplicationError::NotReady`]; [`MapController::ready`] resolves once
//!    the map exists.
//! 3. [`MapAdapter::shutdown`] (also run on drop) stops the poll and cancels
//!    every in-flight directions request.
//!
//! # Route sequencing
//!
//! Each `route_to` call takes a monotonically increasing token. Only the
//! response for the most recently issued token may draw; older responses
//! resolve to [`ApplicationError::Superseded`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use domain::{Coordinate, RouteStats, RouteSummary};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{
    DirectionsPort, MapOptions, MapSdk, MapSurface, MarkerId, OverlayId, PolylineStyle,
};

/// Map adapter settings
#[derive(Debug, Clone)]
pub struct MapAdapterConfig {
    /// Id of the element the map is anchored to
    pub container: String,
    /// Initial viewport
    pub options: MapOptions,
    /// How often to check whether the toolkit has loaded
    pub poll_interval: Duration,
    /// Stroke used for route overlays
    pub route_style: PolylineStyle,
}

impl Default for MapAdapterConfig {
    fn default() -> Self {
        Self {
            container: "map".to_string(),
            options: MapOptions::default(),
            poll_interval: Duration::from_millis(100),
            route_style: PolylineStyle::default(),
        }
    }
}

/// Initialization state of the map instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Still waiting for the toolkit
    Pending,
    /// Map constructed
    Ready,
    /// Toolkit loaded but the map could not be constructed
    Failed(String),
}

#[derive(Debug, Default)]
struct TrackedState {
    markers: Vec<(MarkerId, Coordinate)>,
    route: Option<(OverlayId, usize)>,
}

struct Inner {
    config: MapAdapterConfig,
    directions: Arc<dyn DirectionsPort>,
    surface: OnceLock<Arc<dyn MapSurface>>,
    readiness: watch::Sender<Readiness>,
    state: Mutex<TrackedState>,
    route_token: AtomicU64,
    shutdown: CancellationToken,
}

impl Inner {
    fn surface(&self) -> Result<&Arc<dyn MapSurface>, ApplicationError> {
        if self.shutdown.is_cancelled() {
            return Err(ApplicationError::Cancelled);
        }
        self.surface
            .get()
            .ok_or_else(|| ApplicationError::NotReady("map has not been initialized".to_string()))
    }

    fn attach(&self, surface: Arc<dyn MapSurface>) {
        if self.surface.set(surface).is_ok() {
            self.readiness.send_replace(Readiness::Ready);
            info!(container = %self.config.container, "Map initialized");
        }
    }

    fn clear_route_locked(surface: &dyn MapSurface, state: &mut TrackedState) {
        if let Some((overlay, _)) = state.route.take() {
            surface.remove_overlay(overlay);
            debug!(%overlay, "Route overlay removed");
        }
    }
}

/// Owner of the map instance and its lifecycle
pub struct MapAdapter {
    inner: Arc<Inner>,
    init_started: AtomicBool,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for MapAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapAdapter")
            .field("container", &self.inner.config.container)
            .field("readiness", &*self.inner.readiness.borrow())
            .field("shut_down", &self.inner.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl MapAdapter {
    /// Create an adapter; no map exists until [`Self::initialize`] runs
    #[must_use]
    pub fn new(directions: Arc<dyn DirectionsPort>, config: MapAdapterConfig) -> Self {
        let (readiness, _) = watch::channel(Readiness::Pending);
        Self {
            inner: Arc::new(Inner {
                config,
                directions,
                surface: OnceLock::new(),
                readiness,
                state: Mutex::new(TrackedState::default()),
                route_token: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
            }),
            init_started: AtomicBool::new(false),
            poll_task: Mutex::new(None),
        }
    }

    /// Start polling the toolkit and construct the map once it has loaded
    ///
    /// Must be called from within a Tokio runtime. Calling it again, or after
    /// the map exists, does nothing.
    pub fn initialize(&self, sdk: Arc<dyn MapSdk>) {
        if self.init_started.swap(true, Ordering::SeqCst) {
            debug!("Map initialization already started");
            return;
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut polls: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    () = inner.shutdown.cancelled() => {
                        debug!(polls, "Map readiness poll cancelled");
                        return;
                    },
                    _ = ticker.tick() => {},
                }

                polls += 1;
                if !sdk.is_loaded() {
                    continue;
                }

                match sdk.create_map(&inner.config.container, &inner.config.options) {
                    Ok(surface) => {
                        debug!(polls, "Map toolkit available");
                        inner.attach(surface);
                    },
                    Err(e) => {
                        warn!(error = %e, "Map construction failed");
                        inner.readiness.send_replace(Readiness::Failed(e.to_string()));
                    },
                }
                return;
            }
        });

        *self.poll_task.lock() = Some(handle);
    }

    /// Capability handle for page code
    #[must_use]
    pub fn controller(&self) -> MapController {
        MapController {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Current initialization state
    #[must_use]
    pub fn readiness(&self) -> Readiness {
        self.inner.readiness.borrow().clone()
    }

    /// Stop polling and cancel every pending directions request
    ///
    /// After shutdown all controller operations fail with `Cancelled` and the
    /// map instance is never touched again.
    pub fn shutdown(&self) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }
        self.inner.shutdown.cancel();
        if let Some(handle) = self.poll_task.lock().take() {
            handle.abort();
        }
        info!("Map adapter shut down");
    }
}

impl Drop for MapAdapter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Imperative operations on the map, handed to page code
#[derive(Clone)]
pub struct MapController {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for MapController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapController")
            .field("ready", &self.is_ready())
            .finish_non_exhaustive()
    }
}

impl MapController {
    /// Whether the map instance exists
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.surface.get().is_some() && !self.inner.shutdown.is_cancelled()
    }

    /// Wait until the map instance exists
    ///
    /// # Errors
    ///
    /// `NotReady` if construction failed, `Cancelled` if the adapter was shut
    /// down first.
    pub async fn ready(&self) -> Result<(), ApplicationError> {
        let mut rx = self.inner.readiness.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            match current {
                Readiness::Ready => return Ok(()),
                Readiness::Failed(reason) => return Err(ApplicationError::NotReady(reason)),
                Readiness::Pending => {},
            }

            tokio::select! {
                biased;
                () = self.inner.shutdown.cancelled() => return Err(ApplicationError::Cancelled),
                changed = rx.changed() => {
                    if changed.is_err() {
                        return Err(ApplicationError::Cancelled);
                    }
                },
            }
        }
    }

    /// Recenter on `position` and make it the only tracked marker
    ///
    /// # Errors
    ///
    /// `NotReady` if the map has not been constructed yet; callers retry,
    /// nothing is queued.
    #[instrument(skip_all, fields(position = %position))]
    pub fn move_to(&self, position: Coordinate) -> Result<(), ApplicationError> {
        let surface = self.inner.surface()?;
        let mut state = self.inner.state.lock();

        for (marker, _) in state.markers.drain(..) {
            surface.remove_marker(marker);
        }

        surface.set_center(position);
        let marker = surface.add_marker(position);
        state.markers.push((marker, position));

        debug!(%marker, "Map moved");
        Ok(())
    }

    /// Replace the current route with the driving route from `start` to `goal`
    ///
    /// Clears any drawn route, issues one directions request and, on success,
    /// draws the path and invokes `on_complete` exactly once with its
    /// distance and duration.
    ///
    /// # Errors
    ///
    /// - `NotReady` before the map exists
    /// - any directions failure (`HttpError`, `NoRoute`, `Timeout`, ...)
    /// - `Superseded` when a newer `route_to` was issued meanwhile
    /// - `Cancelled` when the adapter shut down while waiting
    #[instrument(skip_all, fields(start = %start, goal = %goal))]
    pub async fn route_to<F>(
        &self,
        start: Coordinate,
        goal: Coordinate,
        on_complete: F,
    ) -> Result<RouteSummary, ApplicationError>
    where
        F: FnOnce(RouteStats) + Send,
    {
        let surface = Arc::clone(self.inner.surface()?);
        let token = self.inner.route_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.clear_route();

        debug!(token, "Requesting directions");
        let response = tokio::select! {
            biased;
            () = self.inner.shutdown.cancelled() => {
                debug!(token, "Directions request cancelled");
                return Err(ApplicationError::Cancelled);
            },
            response = self.inner.directions.route(&start, &goal) => response,
        };

        let summary = response.inspect_err(|e| warn!(token, error = %e, "Route search failed"))?;
        if summary.path.is_empty() {
            warn!(token, "Directions response contained an empty path");
            return Err(ApplicationError::NoResult(
                "directions response contained an empty path".to_string(),
            ));
        }

        {
            let mut state = self.inner.state.lock();
            if self.inner.shutdown.is_cancelled() {
                return Err(ApplicationError::Cancelled);
            }
            let latest = self.inner.route_token.load(Ordering::SeqCst);
            if latest != token {
                debug!(token, latest, "Discarding stale directions response");
                return Err(ApplicationError::Superseded { token });
            }

            Inner::clear_route_locked(surface.as_ref(), &mut state);
            let overlay = surface.add_polyline(&summary.path, &self.inner.config.route_style);
            state.route = Some((overlay, summary.path.len()));
            info!(
                token,
                %overlay,
                points = summary.path.len(),
                distance_m = summary.distance_meters,
                duration_s = summary.duration_seconds,
                "Route drawn"
            );
        }

        on_complete(summary.stats());
        Ok(summary)
    }

    /// Remove the drawn route, if any
    ///
    /// Safe to call at any time, including before the map exists.
    pub fn clear_route(&self) {
        let Ok(surface) = self.inner.surface() else {
            return;
        };
        let mut state = self.inner.state.lock();
        Inner::clear_route_locked(surface.as_ref(), &mut state);
    }

    /// Positions of the tracked markers
    #[must_use]
    pub fn tracked_markers(&self) -> Vec<Coordinate> {
        self.inner
            .state
            .lock()
            .markers
            .iter()
            .map(|(_, position)| *position)
            .collect()
    }

    /// Number of points in the drawn route, if one is drawn
    #[must_use]
    pub fn route_points(&self) -> Option<usize> {
        self.inner.state.lock().route.map(|(_, points)| points)
    }
}
