//! edroute library entry points.
//!
//! This crate turns Spansh plotter output (live API responses or exported
//! files) into a normalized route, stores it next to the pilot's position, and
//! tracks progress stop by stop. Front ends (the CLI, or any other host) should
//! only depend on the items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod error;
pub mod export;
pub mod navigator;
pub mod parser;
pub mod route;
pub mod session;
pub mod spansh;
pub mod store;

pub use error::{Error, Result};
pub use navigator::{Progress, WaypointView, END_OF_ROAD, NO_ROUTE};
pub use parser::{detect_format, parse_csv, parse_file, parse_itinerary, FormatOrigin};
pub use route::{Body, Route, RouteKind, Waypoint, WaypointDetail};
pub use session::Session;
pub use spansh::{HttpTransport, PlotRequest, RouteClient, RouteTransport, TransportResponse};
pub use store::{resolve_data_dir, RouteStore, SavedRoute};
