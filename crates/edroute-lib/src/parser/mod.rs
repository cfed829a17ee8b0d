//! Route file ingestion.
//!
//! This module provides:
//! - [`HeaderSignature`] and [`SIGNATURES`] - the fixed registry of CSV headers we understand
//! - [`detect_format`] - exact header matching against the registry
//! - [`parse_csv`] - CSV reader for every registered format
//! - [`parse_itinerary`] - reader for the line-oriented text itinerary
//! - [`parse_file`] - picks a reader from the file extension
//!
//! Detection is strict: the comma-joined header line must equal a registered
//! signature exactly, column order included.

mod itinerary;
mod literal;
mod tabular;

pub use itinerary::parse_itinerary;
pub use literal::{format_list_literal, parse_list_literal};
pub use tabular::parse_csv;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::route::{Route, RouteKind};

pub const SYSTEM_HEADER: &str = "System Name";
pub const JUMPS_HEADER: &str = "Jumps";
pub const BODY_NAME_HEADER: &str = "Body Name";
pub const BODY_SUBTYPE_HEADER: &str = "Body Subtype";
pub const RESTOCK_TRITIUM_HEADER: &str = "Restock Tritium";
pub const REFUEL_HEADER: &str = "Refuel";

/// Where a file format comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatOrigin {
    /// Written by our own route store.
    Internal,
    /// Exported by one of the Spansh plotters.
    Import,
}

/// A known CSV header line and what it tells us about the rows below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSignature {
    pub header: &'static str,
    pub kind: RouteKind,
    pub origin: FormatOrigin,
}

const fn signature(
    header: &'static str,
    kind: RouteKind,
    origin: FormatOrigin,
) -> HeaderSignature {
    HeaderSignature {
        header,
        kind,
        origin,
    }
}

/// Every header we accept. The plain internal format has two spellings,
/// with and without the jumps column.
pub const SIGNATURES: &[HeaderSignature] = &[
    signature("System Name", RouteKind::Plain, FormatOrigin::Internal),
    signature("System Name,Jumps", RouteKind::Plain, FormatOrigin::Internal),
    signature(
        "System Name,Jumps,Body Name,Body Subtype",
        RouteKind::RoadToRiches,
        FormatOrigin::Internal,
    ),
    signature(
        "System Name,Jumps,Restock Tritium",
        RouteKind::FleetCarrier,
        FormatOrigin::Internal,
    ),
    signature("System Name,Refuel", RouteKind::Galaxy, FormatOrigin::Internal),
    signature(
        "System Name,Distance To Arrival,Distance Remaining,Neutron Star,Jumps",
        RouteKind::Plain,
        FormatOrigin::Import,
    ),
    signature(
        "System Name,Body Name,Body Subtype,Is Terraformable,Distance To Arrival,Estimated Scan Value,Estimated Mapping Value,Jumps",
        RouteKind::RoadToRiches,
        FormatOrigin::Import,
    ),
    signature(
        "System Name,Distance,Distance Remaining,Fuel Used,Icy Ring,Pristine,Restock Tritium",
        RouteKind::FleetCarrier,
        FormatOrigin::Import,
    ),
    signature(
        "System Name,Distance,Distance Remaining,Fuel Left,Fuel Used,Refuel,Neutron Star",
        RouteKind::Galaxy,
        FormatOrigin::Import,
    ),
];

/// Find the registered signature whose header equals `header_line` exactly.
pub fn detect_format(header_line: &str) -> Result<&'static HeaderSignature> {
    SIGNATURES
        .iter()
        .find(|signature| signature.header == header_line)
        .ok_or_else(|| Error::UnrecognizedFormat {
            header: header_line.to_string(),
        })
}

/// Column names the route store writes for `kind`.
pub fn internal_columns(kind: RouteKind) -> &'static [&'static str] {
    match kind {
        RouteKind::Plain => &[SYSTEM_HEADER, JUMPS_HEADER],
        RouteKind::RoadToRiches => &[
            SYSTEM_HEADER,
            JUMPS_HEADER,
            BODY_NAME_HEADER,
            BODY_SUBTYPE_HEADER,
        ],
        RouteKind::FleetCarrier => &[SYSTEM_HEADER, JUMPS_HEADER, RESTOCK_TRITIUM_HEADER],
        RouteKind::Galaxy => &[SYSTEM_HEADER, REFUEL_HEADER],
    }
}

/// Read a route from disk, choosing the reader from the file extension.
///
/// `.csv` files go through header detection, `.txt` files are read as a text
/// itinerary. Anything else is rejected without touching the file.
pub fn parse_file(path: &Path) -> Result<Route> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let route = match extension.as_deref() {
        Some("csv") => parse_csv(&read_text(path)?)?,
        Some("txt") => parse_itinerary(&read_text(path)?)?,
        _ => {
            return Err(Error::UnsupportedFileType {
                path: path.to_path_buf(),
            })
        }
    };

    debug!(
        path = %path.display(),
        kind = %route.kind(),
        waypoints = route.len(),
        jumps = route.total_jumps(),
        "parsed route file"
    );
    Ok(route)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| Error::file_access(path, err))
}

/// Interpret a Yes/No style flag cell.
pub(crate) fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("true") || value == "1"
}

/// Render a flag the way the plotters write it.
pub(crate) fn format_flag(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_internal_layout_is_registered() {
        for kind in [
            RouteKind::Plain,
            RouteKind::RoadToRiches,
            RouteKind::FleetCarrier,
            RouteKind::Galaxy,
        ] {
            let header = internal_columns(kind).join(",");
            let signature = detect_format(&header).expect("internal header is registered");
            assert_eq!(signature.kind, kind);
            assert_eq!(signature.origin, FormatOrigin::Internal);
        }
    }

    #[test]
    fn detection_is_order_sensitive() {
        assert!(detect_format("Jumps,System Name").is_err());
        assert!(detect_format("System Name, Jumps").is_err());
        assert!(detect_format("system name").is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_file(Path::new("route.json")).expect_err("json is not supported");
        assert!(matches!(err, Error::UnsupportedFileType { .. }));
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("Yes"));
        assert!(parse_flag(" yes "));
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("No"));
        assert!(!parse_flag(""));
    }
}
