//! Handlers that replace, export or clear the current route.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::info;

use edroute_cli::output::OutputFormat;
use edroute_lib::export::default_file_name;
use edroute_lib::{PlotRequest, RouteClient};

use super::Context;

pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the current route?";

/// Arguments for the plot subcommand, as typed.
#[derive(Debug, Clone)]
pub struct PlotArgs {
    pub from: Option<String>,
    pub to: String,
    pub range: String,
    pub efficiency: u8,
}

/// Handle the plot subcommand.
///
/// The source system defaults to the pilot's current location.
pub fn handle_plot(ctx: &mut Context, args: PlotArgs) -> Result<()> {
    let from = args
        .from
        .or_else(|| ctx.current_system.clone())
        .unwrap_or_default();
    let request = PlotRequest::new(&from, &args.to, &args.range, args.efficiency)?;
    let client = RouteClient::spansh(ctx.api_base.as_deref())?;

    if ctx.format == OutputFormat::Text {
        eprintln!("Plotting route from {} to {}...", request.from, request.to);
    }
    let current_system = ctx.current_system.clone();
    let view = ctx.session.plot(&client, &request, current_system.as_deref())?;
    ctx.show_moved(&view)
}

/// Handle the import subcommand.
pub fn handle_import(ctx: &mut Context, path: &Path) -> Result<()> {
    let view = ctx.session.import_file(path)?;
    ctx.show_moved(&view)
}

/// Handle the export subcommand.
///
/// Without a path the plan is written to `"<start> to <end>.exp"` in the
/// working directory.
pub fn handle_export(ctx: &Context, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => PathBuf::from(default_file_name(ctx.session.route())?),
    };
    ctx.session.export_to(&path)?;
    ctx.format.render_notice("exported", "Route exported", Some(&path))?;
    Ok(())
}

/// Handle the clear subcommand, asking for confirmation unless `yes` is set.
pub fn handle_clear(ctx: &mut Context, yes: bool) -> Result<()> {
    if !ctx.session.route().is_empty() && !yes {
        let stdin = io::stdin();
        let confirmed = confirm(&mut stdin.lock(), &mut io::stderr())
            .context("failed to read confirmation")?;
        if !confirmed {
            info!("clear cancelled");
            ctx.format.render_notice("cancelled", "Route kept", None)?;
            return Ok(());
        }
    }
    ctx.session.clear();
    ctx.format.render_notice("cleared", "Route cleared", None)?;
    Ok(())
}

/// Ask [`CLEAR_PROMPT`] and read a yes/no answer. Anything but `y`/`yes` is no.
fn confirm(input: &mut impl BufRead, prompt: &mut impl Write) -> io::Result<bool> {
    write!(prompt, "{} [y/N] ", CLEAR_PROMPT)?;
    prompt.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
