//! Flight plan export for third-party trade tools.
//!
//! One line per waypoint: `"<start> to <end>,<system>"`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::route::Route;

pub const EXPORT_EXTENSION: &str = "exp";

/// `"<first system> to <last system>"`, used as the plan name.
pub fn route_name(route: &Route) -> Result<String> {
    match (route.first(), route.last()) {
        (Some(first), Some(last)) => Ok(format!("{} to {}", first.system, last.system)),
        _ => Err(Error::EmptyRoute),
    }
}

/// Suggested file name for the exported plan.
pub fn default_file_name(route: &Route) -> Result<String> {
    Ok(format!("{}.{}", route_name(route)?, EXPORT_EXTENSION))
}

/// Render the plan text.
pub fn render(route: &Route) -> Result<String> {
    let name = route_name(route)?;
    let mut buffer = String::new();
    for waypoint in route.waypoints() {
        let _ = writeln!(buffer, "{},{}", name, waypoint.system);
    }
    Ok(buffer)
}

/// Write the plan to `path`, replacing any existing file.
pub fn write_to(route: &Route, path: &Path) -> Result<()> {
    let contents = render(route)?;
    fs::write(path, contents).map_err(|err| Error::file_access(path, err))?;
    info!(path = %path.display(), waypoints = route.len(), "exported route");
    Ok(())
}
