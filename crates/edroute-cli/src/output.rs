//! Output formatting for the navigation state.
//!
//! Every subcommand ends by showing a [`WaypointView`] or a short notice,
//! either as human-friendly text or as JSON on stdout.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use edroute_lib::navigator::{REFUEL_NOTICE, RESTOCK_NOTICE};
use edroute_lib::WaypointView;

use crate::terminal::ColorPalette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary.
    #[default]
    Text,
    /// Pretty printed JSON, for scripts and overlays.
    Json,
}

/// Short JSON document for commands that do not produce a view.
#[derive(Debug, Clone, Serialize)]
struct Notice<'a> {
    status: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl OutputFormat {
    /// Print the navigation state.
    pub fn render_view(self, view: &WaypointView) -> io::Result<()> {
        match self {
            OutputFormat::Text => {
                print!("{}", render_text(view, &ColorPalette::detect()));
                Ok(())
            }
            OutputFormat::Json => write_json(view),
        }
    }

    /// Print a one-line notice such as "Route cleared".
    pub fn render_notice(
        self,
        status: &str,
        message: &str,
        path: Option<&Path>,
    ) -> io::Result<()> {
        match self {
            OutputFormat::Text => {
                match path {
                    Some(path) => println!("{} ({})", message, path.display()),
                    None => println!("{}", message),
                }
                Ok(())
            }
            OutputFormat::Json => write_json(&Notice {
                status,
                message,
                path: path.map(|p| p.display().to_string()),
            }),
        }
    }
}

fn write_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Which plot argument to fix after the service rejected the route.
///
/// `--from` falls back to `--current-system`, so the hint names both.
pub fn rejection_hint(source_system: bool, destination_system: bool) -> Option<&'static str> {
    match (source_system, destination_system) {
        (true, true) => Some("check the --from (or --current-system) and --to systems"),
        (true, false) => Some("check the --from (or --current-system) system"),
        (false, true) => Some("check the --to system"),
        (false, false) => None,
    }
}

/// Text rendering of a [`WaypointView`].
pub fn render_text(view: &WaypointView, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();

    let Some(kind) = view.kind else {
        let _ = writeln!(out, "{}", view.next_stop);
        return out;
    };

    let _ = writeln!(out, "{}[ {} ]{}", p.tag_kind, kind.label(), p.reset);
    let _ = writeln!(
        out,
        "{}Next stop:{} {}{}{}",
        p.gray, p.reset, p.white_bold, view.next_stop, p.reset
    );
    if !view.end_of_road {
        let _ = writeln!(
            out,
            "{}Waypoint:{} {}/{}",
            p.gray,
            p.reset,
            view.offset + 1,
            view.waypoints
        );
    }
    let _ = writeln!(
        out,
        "{}Jumps left:{} {}{}{}",
        p.gray, p.reset, p.green, view.jumps_left, p.reset
    );

    if let Some(system) = &view.restock_at {
        let _ = writeln!(out, "{}At: {}{}", p.orange, system, p.reset);
        let _ = writeln!(out, "{}{}{}", p.orange, RESTOCK_NOTICE, p.reset);
    }
    if view.refuel {
        let _ = writeln!(out, "{}{}{}", p.orange, REFUEL_NOTICE, p.reset);
    }
    if let Some(bodies) = &view.bodies {
        let _ = writeln!(out, "{}", bodies);
    }
    out
}
