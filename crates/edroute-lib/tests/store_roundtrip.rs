mod common;

use std::fs;

use edroute_lib::error::Error;
use edroute_lib::{Body, Route, RouteKind, RouteStore, Waypoint};
use tempfile::tempdir;

fn sample_routes() -> Vec<Route> {
    vec![
        Route::new(
            RouteKind::Plain,
            vec![
                Waypoint::plain("Sol", Some(0)),
                Waypoint::plain("Alpha Centauri", None),
                Waypoint::plain("Colonia, the far one", Some(9)),
            ],
        )
        .unwrap(),
        Route::new(
            RouteKind::RoadToRiches,
            vec![
                Waypoint::road_to_riches(
                    "Barnard's Star",
                    0,
                    vec![
                        Body::new("Barnard's Star 1", "Rocky body"),
                        Body::new("Barnard's Star 2 a", "High metal content world"),
                    ],
                ),
                Waypoint::road_to_riches(
                    "Wolf 359",
                    3,
                    vec![Body::new("Wolf 359 1", "Water world")],
                ),
                Waypoint::road_to_riches("Empty Stop", 1, Vec::new()),
            ],
        )
        .unwrap(),
        Route::new(
            RouteKind::FleetCarrier,
            vec![
                Waypoint::fleet_carrier("Sol", 1, false),
                Waypoint::fleet_carrier("Sagittarius A*", 2, true),
            ],
        )
        .unwrap(),
        Route::new(
            RouteKind::Galaxy,
            vec![
                Waypoint::galaxy("Sol", false),
                Waypoint::galaxy("Wolf 359", true),
            ],
        )
        .unwrap(),
    ]
}

#[test]
fn every_kind_survives_save_and_load() {
    for route in sample_routes() {
        let dir = tempdir().unwrap();
        let store = RouteStore::new(dir.path());

        store.save_route(&route).expect("route saves");
        store.save_offset(1, &route).expect("offset saves");

        let saved = store.load().expect("route loads").expect("route present");
        assert_eq!(saved.route, route, "{} route differs", route.kind());
        assert_eq!(saved.offset, 1);
    }
}

#[test]
fn padded_system_names_survive_save_and_load() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path());
    let route = Route::new(
        RouteKind::Galaxy,
        vec![
            Waypoint::galaxy(" Sol", true),
            Waypoint::galaxy("Wolf 359  ", false),
        ],
    )
    .unwrap();

    store.save_route(&route).unwrap();
    let saved = store.load().unwrap().expect("route present");

    assert_eq!(saved.route, route);
    assert_eq!(saved.route.waypoints()[0].system, "Sol");
}

#[test]
fn saved_file_uses_internal_header() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path());
    let route = &sample_routes()[2];

    store.save_route(route).unwrap();
    let contents = fs::read_to_string(store.route_path()).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("System Name,Jumps,Restock Tritium"));
    assert_eq!(lines.next(), Some("Sol,1,No"));
    assert_eq!(lines.next(), Some("Sagittarius A*,2,Yes"));
}

#[test]
fn missing_route_file_means_no_route() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path().join("never-created"));
    assert!(store.load().expect("absence is not an error").is_none());
}

#[test]
fn headerless_legacy_file_is_still_readable() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path());
    fs::write(store.route_path(), "Sol,0\nPraea Euq NW-W b1-3,4\nColonia,5\n").unwrap();
    fs::write(store.offset_path(), "2").unwrap();

    let saved = store.load().unwrap().expect("legacy route present");
    assert_eq!(saved.route.kind(), RouteKind::Plain);
    assert_eq!(saved.route.len(), 3);
    assert_eq!(saved.offset, 2);
    assert_eq!(saved.route.jumps_from(saved.offset), 5);
}

#[test]
fn corrupted_route_file_is_detected() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path());
    store.save_route(&common::neutron_route()).unwrap();

    let mut contents = fs::read_to_string(store.route_path()).unwrap();
    contents.push_str("Injected,1\n");
    fs::write(store.route_path(), contents).unwrap();

    let err = store.load().expect_err("digest mismatch");
    assert!(matches!(err, Error::MalformedRoute { .. }));
}

#[test]
fn offset_problems_fall_back_safely() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path());
    let route = common::neutron_route();
    store.save_route(&route).unwrap();

    fs::write(store.offset_path(), "not a number").unwrap();
    assert_eq!(store.load().unwrap().unwrap().offset, 0);

    fs::write(store.offset_path(), "42").unwrap();
    assert_eq!(store.load().unwrap().unwrap().offset, route.len());

    fs::remove_file(store.offset_path()).unwrap();
    assert_eq!(store.load().unwrap().unwrap().offset, 0);
}

#[test]
fn empty_route_deletes_files() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path());
    let route = common::neutron_route();
    store.save_route(&route).unwrap();
    store.save_offset(2, &route).unwrap();

    store.save_route(&Route::empty()).unwrap();
    store.save_offset(0, &Route::empty()).unwrap();

    assert!(!store.route_path().exists());
    assert!(!store.checksum_path().exists());
    assert!(!store.offset_path().exists());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn clear_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = RouteStore::new(dir.path());
    store.save_route(&common::neutron_route()).unwrap();

    store.clear().expect("first clear");
    store.clear().expect("second clear with nothing left");
    assert!(!store.route_path().exists());
}
