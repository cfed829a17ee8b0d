//! Progress tracking along a route.
//!
//! [`Progress`] is a small `Copy` value: the offset of the next stop and the
//! jumps still ahead. Every operation takes the route by reference and returns
//! a new value, so callers decide when to persist.

use std::fmt::Write;

use serde::Serialize;

use crate::route::{Route, RouteKind, WaypointDetail};

/// Label shown once the offset runs past the last waypoint.
pub const END_OF_ROAD: &str = "End of the road!";
/// Label shown when no route is loaded.
pub const NO_ROUTE: &str = "No route planned";
pub const RESTOCK_NOTICE: &str = "Time to restock Tritium";
pub const REFUEL_NOTICE: &str = "Time to scoop some fuel";

/// Position within a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Progress {
    pub offset: usize,
    pub jumps_left: u64,
}

impl Progress {
    /// Start at `offset`, counting every jump from there to the end.
    ///
    /// Offsets past the end are clamped to `route.len()`, the terminal state.
    pub fn start(route: &Route, offset: usize) -> Self {
        let offset = offset.min(route.len());
        Self {
            offset,
            jumps_left: route.jumps_from(offset),
        }
    }

    pub fn can_advance(&self, route: &Route) -> bool {
        self.offset + 1 < route.len()
    }

    pub fn can_retreat(&self) -> bool {
        self.offset > 0
    }

    pub fn is_end_of_road(&self, route: &Route) -> bool {
        self.offset >= route.len()
    }

    /// Move to the next stop, deducting the jumps of the stop being left.
    ///
    /// Returns `None` when already at the last waypoint.
    pub fn advance(self, route: &Route) -> Option<Self> {
        if !self.can_advance(route) {
            return None;
        }
        let contribution = route.get(self.offset)?.jump_contribution();
        Some(Self {
            offset: self.offset + 1,
            jumps_left: self.jumps_left.saturating_sub(contribution),
        })
    }

    /// Step back one stop, restoring its jumps.
    ///
    /// Returns `None` at the first waypoint.
    pub fn retreat(self, route: &Route) -> Option<Self> {
        if !self.can_retreat() {
            return None;
        }
        let offset = self.offset - 1;
        let contribution = route.get(offset)?.jump_contribution();
        Some(Self {
            offset,
            jumps_left: self.jumps_left + contribution,
        })
    }

    /// Everything a front end needs to show for this position.
    pub fn view(&self, route: &Route) -> WaypointView {
        if route.is_empty() {
            return WaypointView::empty();
        }

        let next = route.get(self.offset);
        let next_stop = next
            .map(|waypoint| waypoint.system.clone())
            .unwrap_or_else(|| END_OF_ROAD.to_string());

        let previous = self.offset.checked_sub(1).and_then(|index| route.get(index));

        let restock_at = match previous.map(|waypoint| &waypoint.detail) {
            Some(WaypointDetail::FleetCarrier {
                restock_tritium: true,
                ..
            }) => previous.map(|waypoint| waypoint.system.clone()),
            _ => None,
        };

        let refuel = matches!(
            next.map(|waypoint| &waypoint.detail),
            Some(WaypointDetail::Galaxy { refuel: true })
        );

        let bodies = if route.kind() == RouteKind::RoadToRiches {
            bodies_text(route, self.offset)
        } else {
            None
        };

        WaypointView {
            kind: Some(route.kind()),
            next_stop,
            offset: self.offset,
            waypoints: route.len(),
            jumps_left: self.jumps_left,
            can_advance: self.can_advance(route),
            can_retreat: self.can_retreat(),
            end_of_road: self.is_end_of_road(route),
            bodies,
            restock_at,
            refuel,
        }
    }
}

/// Display data derived from a route and a [`Progress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaypointView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<RouteKind>,
    pub next_stop: String,
    pub offset: usize,
    pub waypoints: usize,
    pub jumps_left: u64,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub end_of_road: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bodies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restock_at: Option<String>,
    pub refuel: bool,
}

impl WaypointView {
    fn empty() -> Self {
        Self {
            kind: None,
            next_stop: NO_ROUTE.to_string(),
            offset: 0,
            waypoints: 0,
            jumps_left: 0,
            can_advance: false,
            can_retreat: false,
            end_of_road: false,
            bodies: None,
            restock_at: None,
            refuel: false,
        }
    }

    pub fn has_route(&self) -> bool {
        self.waypoints > 0
    }
}

/// Subtype groups in display order. Anything unmatched lands in "Unknown".
const BODY_GROUPS: &[(&str, &str)] = &[
    ("high metal content world", "Metal"),
    ("rocky body", "Rocky"),
    ("earth-like world", "Earth"),
    ("water world", "Water"),
];

/// Bodies to scan in the system the pilot is currently in, which is the stop
/// before `offset` (or the first stop before departing).
pub fn bodies_text(route: &Route, offset: usize) -> Option<String> {
    let index = offset.saturating_sub(1);
    let waypoint = route.get(index)?;
    let prefix = format!("{} ", waypoint.system);

    let mut groups: Vec<(&str, Vec<String>)> = BODY_GROUPS
        .iter()
        .map(|(_, label)| (*label, Vec::new()))
        .chain(std::iter::once(("Unknown", Vec::new())))
        .collect();

    for body in waypoint.bodies() {
        let short_name = body.name.replace(&prefix, "");
        let subtype = body.subtype.to_lowercase();
        let slot = BODY_GROUPS
            .iter()
            .position(|(name, _)| *name == subtype)
            .unwrap_or(BODY_GROUPS.len());
        groups[slot].1.push(short_name);
    }

    let mut text = format!("\n{}:", waypoint.system);
    for (label, names) in groups.iter().filter(|(_, names)| !names.is_empty()) {
        let _ = write!(text, "\n   {}: {}", label, names.join(", "));
    }
    Some(text)
}
