use std::sync::atomic::{AtomicU64, Ordering};

use jiff::Timestamp;
use parking_lot::RwLock;
use tracing::{debug, warn};

use wayline_core::directions::{format_distance, format_duration};
use wayline_core::error::RoutingError;
use wayline_core::export;
use wayline_core::optimizer::optimize;
use wayline_core::route::RouteResult;
use wayline_core::travel_mode::TravelMode;
use wayline_core::waypoint::{MIN_ROUTE_WAYPOINTS, Waypoint};
use wayline_providers::backend::RouteBackend;

use crate::options::{MarkerStyle, RouteOptions};
use crate::sources::{LocationSource, WaypointSource};
use crate::start_point::resolve_start_point;
use crate::surface::{Bounds, MapSurface};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    LoadingWaypoints,
    ResolvingStart,
    Optimizing,
    ComputingRoute,
    RouteReady(RouteResult),
    RouteError(RoutingError),
    EmptyRoute,
}

/// One route-planning session per widget instance.
///
/// A session owns its waypoint set for the duration of a computation and
/// enforces single-flight discipline: every computation captures a
/// generation token at the start, and any state write whose token no longer
/// matches the current generation is dropped silently. A superseded backend
/// response can therefore never reach `RouteReady`.
pub struct RoutePlanningSession<B, L> {
    backend: B,
    location: L,
    options: RwLock<RouteOptions>,
    waypoints: RwLock<Vec<Waypoint>>,

    /// The order actually routed: start-resolved and, when enabled,
    /// optimizer-reordered. Exports read this.
    working: RwLock<Vec<Waypoint>>,

    state: RwLock<SessionState>,
    generation: AtomicU64,
}

impl<B, L> RoutePlanningSession<B, L>
where
    B: RouteBackend + Sync,
    L: LocationSource + Sync,
{
    pub fn new(backend: B, location: L, options: RouteOptions) -> Self {
        Self {
            backend,
            location,
            options: RwLock::new(options),
            waypoints: RwLock::new(Vec::new()),
            working: RwLock::new(Vec::new()),
            state: RwLock::new(SessionState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn options(&self) -> RouteOptions {
        self.options.read().clone()
    }

    pub fn working_waypoints(&self) -> Vec<Waypoint> {
        self.working.read().clone()
    }

    /// Replaces the waypoint set. Any in-flight computation is superseded
    /// and prior route data is cleared; call [`compute`](Self::compute) to
    /// re-enter the pipeline.
    pub fn set_waypoints(&self, waypoints: Vec<Waypoint>) {
        self.invalidate();
        *self.waypoints.write() = waypoints;
    }

    /// Changes the travel mode, superseding any in-flight computation.
    pub fn set_travel_mode(&self, mode: TravelMode) {
        self.invalidate();
        self.options.write().travel_mode = mode;
    }

    /// Fetches waypoints from the collaborator, then computes. A fetch
    /// failure degrades to an empty set, which lands in `EmptyRoute` rather
    /// than taking the page down.
    pub async fn load_waypoints<S: WaypointSource>(
        &self,
        source: &S,
        content_id: &str,
        source_name: &str,
    ) {
        let generation = self.next_generation();
        if !self.enter(generation, SessionState::LoadingWaypoints) {
            return;
        }

        let fetched = match source.fetch_waypoints(content_id, source_name).await {
            Ok(waypoints) => waypoints,
            Err(err) => {
                warn!("waypoint fetch failed: {err:#}");
                Vec::new()
            }
        };

        if !self.is_current(generation) {
            return;
        }
        *self.waypoints.write() = fetched;

        self.compute_generation(generation).await;
    }

    /// Runs the full pipeline: resolve start, optionally optimize, compute
    /// via the backend, publish a terminal state.
    pub async fn compute(&self) {
        let generation = self.next_generation();
        self.compute_generation(generation).await;
    }

    async fn compute_generation(&self, generation: u64) {
        if !self.enter(generation, SessionState::ResolvingStart) {
            return;
        }

        let (input, options) = {
            let waypoints = self.waypoints.read().clone();
            let options = self.options.read().clone();
            (waypoints, options)
        };

        let mut working = resolve_start_point(
            options.start_point_mode,
            input,
            options.custom_start,
            &self.location,
        )
        .await;

        if working.len() < MIN_ROUTE_WAYPOINTS {
            debug!(
                remaining = working.len(),
                "fewer than two waypoints after start resolution"
            );
            self.publish_working(generation, working);
            self.enter(generation, SessionState::EmptyRoute);
            return;
        }

        if options.optimize_route && working.len() > 2 {
            if !self.enter(generation, SessionState::Optimizing) {
                return;
            }
            working = optimize(&working);
        }

        self.publish_working(generation, working.clone());
        if !self.enter(generation, SessionState::ComputingRoute) {
            return;
        }

        let outcome = self
            .backend
            .compute_route(&working, options.travel_mode)
            .await;

        let state = match outcome {
            Ok(route) => SessionState::RouteReady(route),
            Err(error) => {
                warn!(%error, "route computation failed");
                SessionState::RouteError(error)
            }
        };

        if !self.enter(generation, state) {
            debug!(generation, "discarding superseded route response");
        }
    }

    /// Google Maps deep link for the current working order.
    pub fn google_maps_link(&self) -> Option<String> {
        export::google_maps_url(&self.current_order(), self.options.read().travel_mode)
    }

    /// Apple Maps deep link for the current working order.
    pub fn apple_maps_link(&self) -> Option<String> {
        export::apple_maps_url(&self.current_order(), self.options.read().travel_mode)
    }

    /// GPX document for the current working order, stamped with the current
    /// time. A no-op below two waypoints.
    pub fn gpx_export(&self, name: &str) -> Option<String> {
        export::write_gpx(name, &self.current_order(), Timestamp::now())
    }

    /// Formatted `(distance, duration)` pair for the ready route, in the
    /// session's configured unit system.
    pub fn route_summary(&self) -> Option<(String, String)> {
        let state = self.state.read();
        let SessionState::RouteReady(route) = &*state else {
            return None;
        };

        let unit = self.options.read().distance_unit;
        Some((
            format_distance(route.distance_meters, unit),
            format_duration(route.duration_seconds),
        ))
    }

    /// Draws the ready route onto a map surface: one labeled marker per
    /// waypoint in working order, the route line, and a fit-bounds call.
    /// Always clears the surface first, so stale overlays never survive a
    /// recomputation.
    pub fn render_to<S: MapSurface>(&self, surface: &mut S) {
        surface.clear();

        let SessionState::RouteReady(route) = self.state() else {
            return;
        };
        let options = self.options.read().clone();
        let working = self.working.read().clone();

        for (index, waypoint) in working.iter().enumerate() {
            let label = marker_label(options.marker_style, index);
            let popup = if waypoint.address.is_empty() {
                waypoint.label.clone()
            } else {
                format!("{}, {}", waypoint.label, waypoint.address)
            };
            surface.add_marker(waypoint.position, &label, Some(&popup));
        }

        surface.draw_route_line(&route.geometry, &options.route_style());

        if let Some(bounds) = Bounds::containing(route.geometry.iter().copied()) {
            surface.fit_bounds(&bounds);
        }
    }

    fn current_order(&self) -> Vec<Waypoint> {
        let working = self.working.read();
        if working.is_empty() {
            self.waypoints.read().clone()
        } else {
            working.clone()
        }
    }

    /// Stores the working order only if `generation` is still current.
    fn publish_working(&self, generation: u64, working: Vec<Waypoint>) {
        if self.is_current(generation) {
            *self.working.write() = working;
        }
    }

    fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.working.write() = Vec::new();
        *self.state.write() = SessionState::Idle;
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Writes `state` only if `generation` is still current.
    fn enter(&self, generation: u64, state: SessionState) -> bool {
        let mut guard = self.state.write();
        if !self.is_current(generation) {
            return false;
        }
        *guard = state;
        true
    }
}

/// Marker label for the waypoint at `index`: `1, 2, 3, …` or
/// `A, B, … Z, AA, AB, …`.
pub fn marker_label(style: MarkerStyle, index: usize) -> String {
    match style {
        MarkerStyle::Numbered => (index + 1).to_string(),
        MarkerStyle::Lettered => {
            let mut n = index + 1;
            let mut letters = Vec::new();
            while n > 0 {
                n -= 1;
                letters.push(b'A' + (n % 26) as u8);
                n /= 26;
            }
            letters.reverse();
            String::from_utf8(letters).unwrap_or_default()
        }
    }
}
