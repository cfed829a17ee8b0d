use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};
use crate::route::{Body, Route, RouteKind, Waypoint, WaypointDetail};

use super::{
    detect_format, parse_flag, parse_list_literal, FormatOrigin, BODY_NAME_HEADER,
    BODY_SUBTYPE_HEADER, JUMPS_HEADER, REFUEL_HEADER, RESTOCK_TRITIUM_HEADER, SYSTEM_HEADER,
};

/// One data row with access to cells by column name.
struct Row<'a> {
    line: usize,
    headers: &'a StringRecord,
    record: StringRecord,
}

impl Row<'_> {
    /// Cell under `column`, or an empty string when the row is short.
    fn cell(&self, column: &str) -> &str {
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|index| self.record.get(index))
            .unwrap_or("")
    }

    fn system(&self) -> Result<String> {
        let system = self.cell(SYSTEM_HEADER).trim();
        if system.is_empty() {
            return Err(Error::malformed(self.line, "missing system name"));
        }
        Ok(system.to_string())
    }

    fn jumps(&self) -> Result<u32> {
        let raw = self.cell(JUMPS_HEADER).trim();
        raw.parse::<u32>().map_err(|err| {
            Error::malformed(self.line, format!("invalid jump count {raw:?}: {err}"))
        })
    }

    fn optional_jumps(&self) -> Result<Option<u32>> {
        if self.cell(JUMPS_HEADER).trim().is_empty() {
            Ok(None)
        } else {
            self.jumps().map(Some)
        }
    }

    fn body_lists(&self) -> Result<Vec<Body>> {
        let names = parse_list_literal(self.cell(BODY_NAME_HEADER))
            .map_err(|message| Error::malformed(self.line, format!("body names: {message}")))?;
        let subtypes = parse_list_literal(self.cell(BODY_SUBTYPE_HEADER))
            .map_err(|message| Error::malformed(self.line, format!("body subtypes: {message}")))?;
        if names.len() != subtypes.len() {
            return Err(Error::malformed(
                self.line,
                format!(
                    "{} body names but {} body subtypes",
                    names.len(),
                    subtypes.len()
                ),
            ));
        }
        Ok(names
            .into_iter()
            .zip(subtypes)
            .map(|(name, subtype)| Body { name, subtype })
            .collect())
    }
}

/// Parse CSV text in any registered format into a route.
///
/// A leading UTF-8 byte order mark is ignored. Rows whose cells are all blank
/// are skipped.
pub fn parse_csv(content: &str) -> Result<Route> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::None)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let header_line = headers.iter().collect::<Vec<_>>().join(",");
    let signature = detect_format(&header_line)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or_default();
        rows.push(Row {
            line,
            headers: &headers,
            record,
        });
    }

    let waypoints = match (signature.kind, signature.origin) {
        (RouteKind::Plain, _) => plain_rows(&rows)?,
        (RouteKind::RoadToRiches, FormatOrigin::Internal) => riches_rows(&rows)?,
        (RouteKind::RoadToRiches, FormatOrigin::Import) => merge_riches_rows(&rows)?,
        (RouteKind::FleetCarrier, FormatOrigin::Internal) => carrier_rows(&rows, false)?,
        (RouteKind::FleetCarrier, FormatOrigin::Import) => carrier_rows(&rows, true)?,
        (RouteKind::Galaxy, _) => galaxy_rows(&rows)?,
    };

    Route::new(signature.kind, waypoints)
}

fn plain_rows(rows: &[Row<'_>]) -> Result<Vec<Waypoint>> {
    rows.iter()
        .map(|row| Ok(Waypoint::plain(row.system()?, row.optional_jumps()?)))
        .collect()
}

fn riches_rows(rows: &[Row<'_>]) -> Result<Vec<Waypoint>> {
    rows.iter()
        .map(|row| {
            Ok(Waypoint::road_to_riches(
                row.system()?,
                row.jumps()?,
                row.body_lists()?,
            ))
        })
        .collect()
}

/// The Road to Riches export lists one body per row. Consecutive rows for the
/// same system collapse into a single waypoint that owns all of its bodies.
fn merge_riches_rows(rows: &[Row<'_>]) -> Result<Vec<Waypoint>> {
    let mut waypoints: Vec<Waypoint> = Vec::new();

    for row in rows {
        let system = row.system()?;
        let body = Body::new(row.cell(BODY_NAME_HEADER), row.cell(BODY_SUBTYPE_HEADER));

        if let Some(Waypoint {
            system: current,
            detail: WaypointDetail::RoadToRiches { bodies, .. },
        }) = waypoints.last_mut()
        {
            if *current == system {
                bodies.push(body);
                continue;
            }
        }

        waypoints.push(Waypoint::road_to_riches(system, row.jumps()?, vec![body]));
    }

    Ok(waypoints)
}

fn carrier_rows(rows: &[Row<'_>], one_jump_per_row: bool) -> Result<Vec<Waypoint>> {
    rows.iter()
        .map(|row| {
            let jumps = if one_jump_per_row { 1 } else { row.jumps()? };
            Ok(Waypoint::fleet_carrier(
                row.system()?,
                jumps,
                parse_flag(row.cell(RESTOCK_TRITIUM_HEADER)),
            ))
        })
        .collect()
}

fn galaxy_rows(rows: &[Row<'_>]) -> Result<Vec<Waypoint>> {
    rows.iter()
        .map(|row| {
            Ok(Waypoint::galaxy(
                row.system()?,
                parse_flag(row.cell(REFUEL_HEADER)),
            ))
        })
        .collect()
}
