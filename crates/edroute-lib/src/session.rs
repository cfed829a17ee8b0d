//! The route companion as a host application drives it.
//!
//! A [`Session`] owns the current [`Route`], the pilot's [`Progress`] and the
//! [`RouteStore`]. Installing a route replaces both wholesale and saves them;
//! navigation only touches the offset. Parse and plot failures are logged and
//! returned without changing anything. Save failures are logged and swallowed
//! so the pilot can keep flying with an in-memory route.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::export;
use crate::navigator::{Progress, WaypointView};
use crate::parser::parse_file;
use crate::route::Route;
use crate::spansh::{PlotRequest, RouteClient, RouteTransport};
use crate::store::RouteStore;

#[derive(Debug)]
pub struct Session {
    store: RouteStore,
    route: Route,
    progress: Progress,
}

impl Session {
    /// Session with no route, not reading anything from `store`.
    pub fn new(store: RouteStore) -> Self {
        Self {
            store,
            route: Route::empty(),
            progress: Progress::default(),
        }
    }

    /// Restore the route saved by a previous run.
    ///
    /// Anything that prevents reading it back is logged and the session
    /// starts empty.
    pub fn resume(store: RouteStore) -> Self {
        let mut session = Self::new(store);
        match session.store.load() {
            Ok(Some(saved)) => {
                session.progress = Progress::start(&saved.route, saved.offset);
                session.route = saved.route;
                info!(
                    kind = %session.route.kind(),
                    waypoints = session.route.len(),
                    offset = session.progress.offset,
                    "resumed saved route"
                );
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    path = %session.store.route_path().display(),
                    error = %err,
                    "failed to restore saved route, starting empty"
                );
            }
        }
        session
    }

    pub fn store(&self) -> &RouteStore {
        &self.store
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn view(&self) -> WaypointView {
        self.progress.view(&self.route)
    }

    /// Text to put on the clipboard: the next stop, if there is one.
    pub fn next_stop(&self) -> Option<&str> {
        self.route
            .get(self.progress.offset)
            .map(|waypoint| waypoint.system.as_str())
    }

    /// Load a route from a `.csv` or `.txt` file and start at its first stop.
    pub fn import_file(&mut self, path: &Path) -> Result<WaypointView> {
        let route = parse_file(path).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "failed to import route file");
        })?;
        self.install(route, 0)
    }

    /// Plot a route with the remote service and install it.
    ///
    /// When the first stop is where the pilot already is, navigation starts at
    /// the second stop.
    pub fn plot<T: RouteTransport>(
        &mut self,
        client: &RouteClient<T>,
        request: &PlotRequest,
        current_location: Option<&str>,
    ) -> Result<WaypointView> {
        let route = client.plot(request).inspect_err(|err| {
            warn!(
                from = %request.from,
                to = %request.to,
                error = %err,
                "failed to plot route"
            );
        })?;
        self.install_remote(route, current_location)
    }

    /// Install a route fetched from the remote service.
    pub fn install_remote(
        &mut self,
        route: Route,
        current_location: Option<&str>,
    ) -> Result<WaypointView> {
        let offset = remote_start_offset(&route, current_location);
        self.install(route, offset)
    }

    fn install(&mut self, route: Route, offset: usize) -> Result<WaypointView> {
        if route.is_empty() {
            warn!("refusing to install a route without waypoints");
            return Err(Error::EmptyRoute);
        }
        self.progress = Progress::start(&route, offset);
        self.route = route;
        info!(
            kind = %self.route.kind(),
            waypoints = self.route.len(),
            jumps = self.progress.jumps_left,
            offset = self.progress.offset,
            "installed route"
        );
        self.persist_route();
        self.persist_offset();
        Ok(self.view())
    }

    /// Move to the next stop. Returns `None` when already at the last one.
    pub fn advance(&mut self) -> Option<WaypointView> {
        let next = self.progress.advance(&self.route)?;
        self.progress = next;
        self.persist_offset();
        Some(self.view())
    }

    /// Move back one stop. Returns `None` at the first one.
    pub fn retreat(&mut self) -> Option<WaypointView> {
        let previous = self.progress.retreat(&self.route)?;
        self.progress = previous;
        self.persist_offset();
        Some(self.view())
    }

    /// Forget the route and delete its files.
    pub fn clear(&mut self) {
        self.route = Route::empty();
        self.progress = Progress::default();
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to delete saved route files");
        }
        info!("cleared route");
    }

    /// Export the current route as a flight plan.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        if self.route.is_empty() {
            info!("no route to export");
            return Err(Error::EmptyRoute);
        }
        export::write_to(&self.route, path).inspect_err(|err| {
            warn!(path = %path.display(), error = %err, "failed to export route");
        })
    }

    fn persist_route(&self) {
        if let Err(err) = self.store.save_route(&self.route) {
            warn!(
                path = %self.store.route_path().display(),
                error = %err,
                "failed to save route"
            );
        }
    }

    fn persist_offset(&self) {
        if let Err(err) = self.store.save_offset(self.progress.offset, &self.route) {
            warn!(
                path = %self.store.offset_path().display(),
                error = %err,
                "failed to save offset"
            );
        }
    }
}

/// Offset to start a freshly plotted route at.
pub fn remote_start_offset(route: &Route, current_location: Option<&str>) -> usize {
    match (route.first(), current_location) {
        (Some(first), Some(location)) if route.len() > 1 && first.system == location => 1,
        _ => 0,
    }
}
