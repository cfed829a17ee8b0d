//! Line-oriented text itineraries.
//!
//! Only lines starting with `===` (after leading whitespace) describe the route:
//!
//! ```text
//! === Sol --- 12 jumps ---> Colonia
//! === Colonia --- 3 jumps ---> Ratraii, Eol Prou RS-T d3-94
//! ```
//!
//! The digits before ` jump` give the jump count and everything after the last
//! `>` lists the systems reached by that block.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::route::{Route, RouteKind, Waypoint};

const MARKER: &str = "===";

static JUMP_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) jump").expect("jump count pattern is valid"));

/// Parse a text itinerary into a plain route.
///
/// When a block names several systems, the block's jump count belongs to the
/// first one and each following system counts a single jump.
pub fn parse_itinerary(content: &str) -> Result<Route> {
    let mut waypoints = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if !line.trim_start().starts_with(MARKER) {
            continue;
        }

        let jumps = JUMP_COUNT
            .captures(line)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| Error::malformed(line_number, "marker line has no jump count"))?
            .as_str()
            .parse::<u32>()
            .map_err(|err| Error::malformed(line_number, format!("invalid jump count: {err}")))?;

        let systems = line
            .rfind('>')
            .map(|position| &line[position + 1..])
            .ok_or_else(|| Error::malformed(line_number, "marker line has no '>'"))?;

        let mut names = systems
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .peekable();
        if names.peek().is_none() {
            return Err(Error::malformed(line_number, "marker line names no system"));
        }

        for (position, name) in names.enumerate() {
            let block_jumps = if position == 0 { jumps } else { 1 };
            waypoints.push(Waypoint::plain(name, Some(block_jumps)));
        }
    }

    Route::new(RouteKind::Plain, waypoints)
}
