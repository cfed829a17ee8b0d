//! Durable storage for the current route and the pilot's position on it.
//!
//! Two flat files live in the data directory: `route.csv` (header plus one row
//! per waypoint) and `offset` (a single integer). Both are rewritten in full on
//! every save through a temporary file and an atomic rename. A SHA-256 digest
//! of the route file is kept next to it in `route.csv.sha256` so a damaged file
//! is detected on load instead of silently producing a wrong route.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::parser::{format_flag, format_list_literal, internal_columns, parse_csv, SYSTEM_HEADER};
use crate::route::{Route, RouteKind, Waypoint, WaypointDetail};

pub const ROUTE_FILENAME: &str = "route.csv";
pub const OFFSET_FILENAME: &str = "offset";
pub const CHECKSUM_FILENAME: &str = "route.csv.sha256";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "EDROUTE_DATA_DIR";

/// Resolve the platform data directory for route storage.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "edroute", "edroute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Pick the data directory.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `EDROUTE_DATA_DIR` environment variable.
/// 3. Platform-specific project directories.
pub fn resolve_data_dir(target: Option<&Path>) -> Result<PathBuf> {
    if let Some(explicit) = target {
        return Ok(explicit.to_path_buf());
    }
    if let Some(env_dir) = env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(env_dir));
    }
    default_data_dir()
}

/// A route read back from disk together with the saved offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRoute {
    pub route: Route,
    pub offset: usize,
}

/// File-backed storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct RouteStore {
    dir: PathBuf,
}

impl RouteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the directory chosen by [`resolve_data_dir`].
    pub fn open(target: Option<&Path>) -> Result<Self> {
        resolve_data_dir(target).map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn route_path(&self) -> PathBuf {
        self.dir.join(ROUTE_FILENAME)
    }

    pub fn offset_path(&self) -> PathBuf {
        self.dir.join(OFFSET_FILENAME)
    }

    pub fn checksum_path(&self) -> PathBuf {
        self.dir.join(CHECKSUM_FILENAME)
    }

    /// Rewrite the route file, or delete it when `route` is empty.
    pub fn save_route(&self, route: &Route) -> Result<()> {
        let path = self.route_path();
        if route.is_empty() {
            remove_if_present(&path)?;
            remove_if_present(&self.checksum_path())?;
            return Ok(());
        }

        let contents = self.replace_route_file(route)?;
        write_atomic(&self.checksum_path(), digest(&contents).as_bytes())?;
        debug!(
            path = %path.display(),
            kind = %route.kind(),
            waypoints = route.len(),
            "saved route"
        );
        Ok(())
    }

    /// Swap in the new route file and return the bytes written.
    ///
    /// The old digest goes first: a route file without a sidecar loads, one
    /// next to a stale digest does not.
    fn replace_route_file(&self, route: &Route) -> Result<Vec<u8>> {
        let path = self.route_path();
        let contents = encode_route(route, &path)?;
        remove_if_present(&self.checksum_path())?;
        write_atomic(&path, &contents)?;
        Ok(contents)
    }

    /// Rewrite the offset file, or delete it when `route` is empty.
    pub fn save_offset(&self, offset: usize, route: &Route) -> Result<()> {
        let path = self.offset_path();
        if route.is_empty() {
            return remove_if_present(&path);
        }
        write_atomic(&path, offset.to_string().as_bytes())?;
        debug!(path = %path.display(), offset, "saved offset");
        Ok(())
    }

    /// Read the saved route back.
    ///
    /// A missing route file means there is no previous route and yields
    /// `Ok(None)`. Files without a header row are read in the legacy
    /// `system,jumps` layout.
    pub fn load(&self) -> Result<Option<SavedRoute>> {
        let path = self.route_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no previously saved route");
                return Ok(None);
            }
            Err(err) => return Err(Error::file_access(&path, err)),
        };

        self.verify_checksum(&bytes)?;

        let text = String::from_utf8(bytes)
            .map_err(|err| Error::malformed(0, format!("route file is not UTF-8: {err}")))?;

        let route = if has_header(&text)? {
            parse_csv(&text)?
        } else {
            debug!(path = %path.display(), "reading headerless legacy route file");
            parse_legacy(&text)?
        };

        if route.is_empty() {
            info!(path = %path.display(), "saved route file holds no waypoints");
            return Ok(None);
        }

        let offset = self.load_offset(&route);
        Ok(Some(SavedRoute { route, offset }))
    }

    /// Delete every persisted file. Missing files are fine.
    pub fn clear(&self) -> Result<()> {
        remove_if_present(&self.route_path())?;
        remove_if_present(&self.checksum_path())?;
        remove_if_present(&self.offset_path())
    }

    fn verify_checksum(&self, contents: &[u8]) -> Result<()> {
        let path = self.checksum_path();
        let expected = match fs::read_to_string(&path) {
            Ok(expected) => expected,
            // Files written before the digest existed have no sidecar.
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(Error::file_access(&path, err)),
        };

        if expected.trim() != digest(contents) {
            return Err(Error::malformed(0, "checksum mismatch - route file may be corrupted"));
        }
        Ok(())
    }

    fn load_offset(&self, route: &Route) -> usize {
        let path = self.offset_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to read offset, starting at 0"
                    );
                }
                return 0;
            }
        };

        match raw.trim().parse::<usize>() {
            Ok(offset) if offset > route.len() => {
                warn!(
                    offset,
                    waypoints = route.len(),
                    "saved offset is past the end of the route, clamping"
                );
                route.len()
            }
            Ok(offset) => offset,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "invalid offset file, starting at 0");
                0
            }
        }
    }
}

fn encode_route(route: &Route, path: &Path) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(internal_columns(route.kind()))?;

    for waypoint in route.waypoints() {
        writer.write_record(&encode_waypoint(waypoint))?;
    }

    writer
        .into_inner()
        .map_err(|err| Error::file_access(path, err.into_error()))
}

fn encode_waypoint(waypoint: &Waypoint) -> Vec<String> {
    let system = waypoint.system.clone();
    match &waypoint.detail {
        WaypointDetail::Plain { jumps } => {
            vec![system, jumps.map(|j| j.to_string()).unwrap_or_default()]
        }
        WaypointDetail::RoadToRiches { jumps, bodies } => {
            let names = bodies.iter().map(|body| body.name.as_str()).collect::<Vec<_>>();
            let subtypes = bodies
                .iter()
                .map(|body| body.subtype.as_str())
                .collect::<Vec<_>>();
            vec![
                system,
                jumps.to_string(),
                format_list_literal(&names),
                format_list_literal(&subtypes),
            ]
        }
        WaypointDetail::FleetCarrier {
            jumps,
            restock_tritium,
        } => vec![
            system,
            jumps.to_string(),
            format_flag(*restock_tritium).to_string(),
        ],
        WaypointDetail::Galaxy { refuel } => vec![system, format_flag(*refuel).to_string()],
    }
}

/// Whether the first field of the file is the system column header.
fn has_header(text: &str) -> Result<bool> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let first = reader.records().next().transpose()?;
    Ok(first
        .as_ref()
        .and_then(|record| record.get(0))
        .is_some_and(|field| field == SYSTEM_HEADER))
}

/// Headerless files from older versions: every row is `system,jumps`.
fn parse_legacy(text: &str) -> Result<Route> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut waypoints = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or_default();
        let system = record.get(0).unwrap_or("").trim();
        let jumps = match record.get(1).map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(raw.parse::<u32>().map_err(|err| {
                Error::malformed(line, format!("invalid jump count {raw:?}: {err}"))
            })?),
            None => None,
        };
        waypoints.push(Waypoint::plain(system, jumps));
    }

    Route::new(RouteKind::Plain, waypoints)
}

fn digest(contents: &[u8]) -> String {
    hex::encode(Sha256::digest(contents))
}

fn write_atomic(destination: &Path, contents: &[u8]) -> Result<()> {
    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|err| Error::file_access(parent, err))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|err| Error::file_access(parent, err))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.flush())
        .map_err(|err| Error::file_access(destination, err))?;
    tmp.persist(destination)
        .map_err(|err| Error::file_access(destination, err.error))?;
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "nothing to delete");
            Ok(())
        }
        Err(err) => Err(Error::file_access(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn legacy_rows_become_plain_waypoints() {
        let route = parse_legacy("Sol,0\nAlpha,5\nBeta,\n").expect("legacy parses");
        assert_eq!(route.kind(), RouteKind::Plain);
        assert_eq!(
            route.waypoints(),
            &[
                Waypoint::plain("Sol", Some(0)),
                Waypoint::plain("Alpha", Some(5)),
                Waypoint::plain("Beta", None),
            ]
        );
    }

    #[test]
    fn header_detection_reads_first_field_only() {
        assert!(has_header("System Name,Jumps\nSol,1\n").unwrap());
        assert!(has_header("System Name,Refuel\n").unwrap());
        assert!(!has_header("Sol,1\n").unwrap());
        assert!(!has_header("").unwrap());
    }

    #[test]
    fn interrupted_save_keeps_the_new_route() {
        let dir = tempdir().unwrap();
        let store = RouteStore::new(dir.path());
        let old = Route::new(RouteKind::Plain, vec![Waypoint::plain("Old", Some(1))]).unwrap();
        store.save_route(&old).unwrap();
        assert!(store.checksum_path().exists());

        // Stop after the route file is replaced, before the new digest lands.
        let new = Route::new(
            RouteKind::Plain,
            vec![Waypoint::plain("Sol", Some(0)), Waypoint::plain("Alpha", Some(3))],
        )
        .unwrap();
        store.replace_route_file(&new).unwrap();

        assert!(!store.checksum_path().exists());
        let saved = store.load().unwrap().expect("new route present");
        assert_eq!(saved.route, new);
    }

    #[test]
    fn offset_is_deleted_with_an_empty_route() {
        let dir = tempdir().unwrap();
        let store = RouteStore::new(dir.path());
        let route = Route::new(RouteKind::Plain, vec![Waypoint::plain("Sol", None)]).unwrap();

        store.save_offset(3, &route).unwrap();
        assert_eq!(fs::read_to_string(store.offset_path()).unwrap(), "3");

        store.save_offset(0, &Route::empty()).unwrap();
        assert!(!store.offset_path().exists());
    }

    #[test]
    fn explicit_dir_wins_over_environment() {
        let dir = PathBuf::from("/tmp/explicit-edroute");
        assert_eq!(resolve_data_dir(Some(&dir)).unwrap(), dir);
    }
}
