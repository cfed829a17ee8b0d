//! Normalized route model shared by the parsers, the store and the navigator.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Which planner produced a route. Decides the payload of every waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Neutron plotter or hand written list: system plus optional jump count.
    #[default]
    Plain,
    /// Road to Riches: system, jumps and the bodies worth scanning there.
    RoadToRiches,
    /// Fleet carrier plotter: system, jumps and a tritium restock flag.
    FleetCarrier,
    /// Galaxy plotter: one jump per stop plus a refuel flag.
    Galaxy,
}

impl RouteKind {
    /// Human-readable label shown in textual renderings.
    pub fn label(self) -> &'static str {
        match self {
            RouteKind::Plain => "Neutron",
            RouteKind::RoadToRiches => "Road to Riches",
            RouteKind::FleetCarrier => "Fleet Carrier",
            RouteKind::Galaxy => "Galaxy",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A body to scan in a Road to Riches system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
    pub name: String,
    pub subtype: String,
}

impl Body {
    pub fn new(name: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtype: subtype.into(),
        }
    }
}

/// Kind specific payload of a waypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaypointDetail {
    Plain {
        #[serde(skip_serializing_if = "Option::is_none")]
        jumps: Option<u32>,
    },
    RoadToRiches {
        jumps: u32,
        bodies: Vec<Body>,
    },
    FleetCarrier {
        jumps: u32,
        restock_tritium: bool,
    },
    Galaxy {
        refuel: bool,
    },
}

impl WaypointDetail {
    pub fn kind(&self) -> RouteKind {
        match self {
            WaypointDetail::Plain { .. } => RouteKind::Plain,
            WaypointDetail::RoadToRiches { .. } => RouteKind::RoadToRiches,
            WaypointDetail::FleetCarrier { .. } => RouteKind::FleetCarrier,
            WaypointDetail::Galaxy { .. } => RouteKind::Galaxy,
        }
    }
}

/// One stop on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Waypoint {
    pub system: String,
    #[serde(flatten)]
    pub detail: WaypointDetail,
}

impl Waypoint {
    pub fn plain(system: impl Into<String>, jumps: Option<u32>) -> Self {
        Self {
            system: system.into(),
            detail: WaypointDetail::Plain { jumps },
        }
    }

    pub fn road_to_riches(system: impl Into<String>, jumps: u32, bodies: Vec<Body>) -> Self {
        Self {
            system: system.into(),
            detail: WaypointDetail::RoadToRiches { jumps, bodies },
        }
    }

    pub fn fleet_carrier(system: impl Into<String>, jumps: u32, restock_tritium: bool) -> Self {
        Self {
            system: system.into(),
            detail: WaypointDetail::FleetCarrier {
                jumps,
                restock_tritium,
            },
        }
    }

    pub fn galaxy(system: impl Into<String>, refuel: bool) -> Self {
        Self {
            system: system.into(),
            detail: WaypointDetail::Galaxy { refuel },
        }
    }

    pub fn kind(&self) -> RouteKind {
        self.detail.kind()
    }

    /// Jumps this stop accounts for in the remaining-jumps counter.
    ///
    /// Galaxy stops always count one jump; a plain stop without a count adds nothing.
    pub fn jump_contribution(&self) -> u64 {
        match &self.detail {
            WaypointDetail::Plain { jumps } => jumps.map(u64::from).unwrap_or(0),
            WaypointDetail::RoadToRiches { jumps, .. } => u64::from(*jumps),
            WaypointDetail::FleetCarrier { jumps, .. } => u64::from(*jumps),
            WaypointDetail::Galaxy { .. } => 1,
        }
    }

    /// Bodies listed for this stop (empty for kinds without bodies).
    pub fn bodies(&self) -> &[Body] {
        match &self.detail {
            WaypointDetail::RoadToRiches { bodies, .. } => bodies,
            _ => &[],
        }
    }
}

/// An ordered list of waypoints of a single kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Route {
    kind: RouteKind,
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Build a route, rejecting waypoints whose payload does not match `kind`
    /// or whose system name is blank.
    ///
    /// System names are stored without surrounding whitespace.
    pub fn new(kind: RouteKind, mut waypoints: Vec<Waypoint>) -> Result<Self> {
        for (index, waypoint) in waypoints.iter_mut().enumerate() {
            let trimmed = waypoint.system.trim();
            if trimmed.len() != waypoint.system.len() {
                waypoint.system = trimmed.to_string();
            }
            if waypoint.system.is_empty() {
                return Err(Error::malformed(index + 1, "waypoint has an empty system name"));
            }
            if waypoint.kind() != kind {
                return Err(Error::malformed(
                    index + 1,
                    format!(
                        "waypoint {} is a {} stop inside a {} route",
                        waypoint.system,
                        waypoint.kind(),
                        kind
                    ),
                ));
            }
        }
        Ok(Self { kind, waypoints })
    }

    /// The empty "no route planned" value.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Jumps still ahead when the next stop is `offset`.
    pub fn jumps_from(&self, offset: usize) -> u64 {
        self.waypoints
            .iter()
            .skip(offset)
            .map(Waypoint::jump_contribution)
            .sum()
    }

    /// Jumps across the whole route.
    pub fn total_jumps(&self) -> u64 {
        self.jumps_from(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mixed_kinds() {
        let err = Route::new(
            RouteKind::Galaxy,
            vec![Waypoint::galaxy("Sol", false), Waypoint::plain("Alpha", Some(2))],
        )
        .expect_err("mixed kinds must be rejected");
        match err {
            Error::MalformedRoute { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_system() {
        assert!(Route::new(RouteKind::Plain, vec![Waypoint::plain("  ", None)]).is_err());
    }

    #[test]
    fn system_names_are_trimmed() {
        let route = Route::new(
            RouteKind::Galaxy,
            vec![Waypoint::galaxy(" Sol", true), Waypoint::galaxy("Alpha \t", false)],
        )
        .unwrap();
        assert_eq!(route.waypoints()[0].system, "Sol");
        assert_eq!(route.waypoints()[1].system, "Alpha");
    }

    #[test]
    fn contributions_follow_kind() {
        assert_eq!(Waypoint::plain("A", None).jump_contribution(), 0);
        assert_eq!(Waypoint::plain("A", Some(4)).jump_contribution(), 4);
        assert_eq!(Waypoint::galaxy("A", true).jump_contribution(), 1);
        assert_eq!(Waypoint::fleet_carrier("A", 3, false).jump_contribution(), 3);
        assert_eq!(
            Waypoint::road_to_riches("A", 2, Vec::new()).jump_contribution(),
            2
        );
    }

    #[test]
    fn cloned_waypoint_does_not_share_bodies() {
        let original = Waypoint::road_to_riches("Sol", 1, vec![Body::new("Sol A", "Rocky body")]);
        let mut copy = original.clone();
        if let WaypointDetail::RoadToRiches { bodies, .. } = &mut copy.detail {
            bodies.push(Body::new("Sol B", "Water world"));
        }
        assert_eq!(original.bodies().len(), 1);
        assert_eq!(copy.bodies().len(), 2);
    }

    #[test]
    fn jumps_from_skips_visited_stops() {
        let route = Route::new(
            RouteKind::Plain,
            vec![
                Waypoint::plain("A", Some(0)),
                Waypoint::plain("B", Some(3)),
                Waypoint::plain("C", Some(2)),
            ],
        )
        .unwrap();
        assert_eq!(route.total_jumps(), 5);
        assert_eq!(route.jumps_from(2), 2);
        assert_eq!(route.jumps_from(3), 0);
    }
}
