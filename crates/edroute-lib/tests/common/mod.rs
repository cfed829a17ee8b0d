#![allow(dead_code)]

use std::path::PathBuf;

use edroute_lib::{Route, RouteKind, Waypoint};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Four stop neutron route starting at Sol.
pub fn neutron_route() -> Route {
    Route::new(
        RouteKind::Plain,
        vec![
            Waypoint::plain("Sol", Some(0)),
            Waypoint::plain("Praea Euq NW-W b1-3", Some(4)),
            Waypoint::plain("Praea Euq JH-V c2-11", Some(2)),
            Waypoint::plain("Colonia", Some(5)),
        ],
    )
    .expect("valid route")
}
