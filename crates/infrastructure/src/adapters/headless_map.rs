//! In-process map widget - Implements MapSdk and MapSurface without a display
//!
//! Used by the command line front end and by tests. The surface records
//! its viewport, markers and overlays so callers can inspect what a real
//! widget would have drawn.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{MapOptions, MapSdk, MapSurface, MarkerId, OverlayId, PolylineStyle};
use domain::Coordinate;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A drawn polyline
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Vertices in drawing order
    pub path: Vec<Coordinate>,
    /// Stroke
    pub style: PolylineStyle,
}

/// Map instance that records every draw call
#[derive(Debug)]
pub struct HeadlessMap {
    container: String,
    zoom: u8,
    center: Mutex<Coordinate>,
    markers: Mutex<BTreeMap<u64, Coordinate>>,
    overlays: Mutex<BTreeMap<u64, Polyline>>,
    next_id: AtomicU64,
}

impl HeadlessMap {
    fn new(container: &str, options: &MapOptions) -> Self {
        Self {
            container: container.to_string(),
            zoom: options.zoom,
            center: Mutex::new(options.center),
            markers: Mutex::new(BTreeMap::new()),
            overlays: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Element the map is anchored to
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Initial zoom level
    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Positions of the markers currently on the map
    #[must_use]
    pub fn markers(&self) -> Vec<Coordinate> {
        self.markers.lock().values().copied().collect()
    }

    /// Polylines currently on the map
    #[must_use]
    pub fn polylines(&self) -> Vec<Polyline> {
        self.overlays.lock().values().cloned().collect()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl MapSurface for HeadlessMap {
    fn set_center(&self, position: Coordinate) {
        debug!(%position, "Map center moved");
        *self.center.lock() = position;
    }

    fn center(&self) -> Coordinate {
        *self.center.lock()
    }

    fn add_marker(&self, position: Coordinate) -> MarkerId {
        let id = self.next_id();
        self.markers.lock().insert(id, position);
        debug!(marker = id, %position, "Marker added");
        MarkerId(id)
    }

    fn remove_marker(&self, marker: MarkerId) {
        self.markers.lock().remove(&marker.0);
    }

    fn add_polyline(&self, path: &[Coordinate], style: &PolylineStyle) -> OverlayId {
        let id = self.next_id();
        self.overlays.lock().insert(
            id,
            Polyline {
                path: path.to_vec(),
                style: style.clone(),
            },
        );
        debug!(overlay = id, points = path.len(), "Polyline drawn");
        OverlayId(id)
    }

    fn remove_overlay(&self, overlay: OverlayId) {
        self.overlays.lock().remove(&overlay.0);
    }
}

/// Toolkit stand-in whose readiness can be flipped at runtime
#[derive(Debug, Default)]
pub struct HeadlessMapSdk {
    loaded: AtomicBool,
    last_map: Mutex<Option<Arc<HeadlessMap>>>,
}

impl HeadlessMapSdk {
    /// Create a toolkit, optionally already loaded
    #[must_use]
    pub fn new(loaded: bool) -> Self {
        Self {
            loaded: AtomicBool::new(loaded),
            last_map: Mutex::new(None),
        }
    }

    /// Mark the toolkit as available
    pub fn mark_loaded(&self) {
        info!("Map toolkit loaded");
        self.loaded.store(true, Ordering::Release);
    }

    /// Become available after `delay`, like a script tag finishing its download
    pub fn load_after(self: &Arc<Self>, delay: Duration) -> JoinHandle<()> {
        let sdk = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sdk.mark_loaded();
        })
    }

    /// Most recently constructed map
    #[must_use]
    pub fn last_map(&self) -> Option<Arc<HeadlessMap>> {
        self.last_map.lock().clone()
    }
}

impl MapSdk for HeadlessMapSdk {
    fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    fn create_map(
        &self,
        container: &str,
        options: &MapOptions,
    ) -> Result<Arc<dyn MapSurface>, ApplicationError> {
        if !self.is_loaded() {
            return Err(ApplicationError::NotReady(
                "map toolkit is not loaded".to_string(),
            ));
        }
        if container.trim().is_empty() {
            return Err(ApplicationError::Validation(
                "map container must not be empty".to_string(),
            ));
        }

        let map = Arc::new(HeadlessMap::new(container, options));
        *self.last_map.lock() = Some(Arc::clone(&map));
        info!(container, zoom = options.zoom, "Map created");
        Ok(map)
    }
}
