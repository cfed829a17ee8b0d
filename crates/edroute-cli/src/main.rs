mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use edroute_cli::clipboard::{ClipboardSink, NoClipboard, SystemClipboard};
use edroute_cli::output::{rejection_hint, OutputFormat};
use edroute_cli::terminal::ColorPalette;
use edroute_lib::spansh::DEFAULT_EFFICIENCY;
use edroute_lib::{Error as LibError, RouteStore, Session};

use commands::route::PlotArgs;
use commands::Context;

#[derive(Parser, Debug)]
#[command(
    name = "edroute",
    author,
    version,
    about = "Plot, import and follow Elite Dangerous routes one stop at a time"
)]
struct Cli {
    /// Directory holding the saved route (overrides EDROUTE_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Base URL of the plotter API (overrides EDROUTE_API_BASE).
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// System the commander is currently in.
    #[arg(long, env = "EDROUTE_CURRENT_SYSTEM", global = true)]
    current_system: Option<String>,

    /// Do not copy the next stop to the clipboard.
    #[arg(long, global = true)]
    no_copy: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot a neutron route with Spansh and start following it.
    Plot {
        /// Starting system. Defaults to the current system.
        #[arg(long = "from")]
        from: Option<String>,
        /// Destination system.
        #[arg(long = "to")]
        to: String,
        /// Jump range in light years.
        #[arg(long)]
        range: String,
        /// Plotter efficiency, 1 to 100.
        #[arg(long, default_value_t = DEFAULT_EFFICIENCY)]
        efficiency: u8,
    },
    /// Import a route exported by one of the Spansh plotters (.csv or .txt).
    Import {
        /// Path to the exported file.
        path: PathBuf,
    },
    /// Move to the next stop.
    Next,
    /// Move back to the previous stop.
    Prev,
    /// Show the current stop without moving.
    Status,
    /// Copy the next stop to the clipboard.
    Copy,
    /// Export the route as a flight plan for trade tools.
    Export {
        /// Output file. Defaults to "<start> to <end>.exp".
        path: Option<PathBuf>,
    },
    /// Forget the current route.
    Clear {
        /// Do not ask for confirmation.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = RouteStore::open(cli.data_dir.as_deref())
        .context("failed to resolve the route data directory")?;
    let clipboard: Box<dyn ClipboardSink> = if cli.no_copy {
        Box::new(NoClipboard)
    } else {
        Box::new(SystemClipboard)
    };
    let mut ctx = Context {
        session: Session::resume(store),
        format: cli.format,
        clipboard,
        current_system: cli.current_system,
        api_base: cli.api_base,
    };

    match cli.command {
        Command::Plot {
            from,
            to,
            range,
            efficiency,
        } => commands::route::handle_plot(
            &mut ctx,
            PlotArgs {
                from,
                to,
                range,
                efficiency,
            },
        ),
        Command::Import { path } => commands::route::handle_import(&mut ctx, &path),
        Command::Next => commands::navigate::handle_next(&mut ctx),
        Command::Prev => commands::navigate::handle_prev(&mut ctx),
        Command::Status => commands::navigate::handle_status(&ctx),
        Command::Copy => commands::navigate::handle_copy(&mut ctx),
        Command::Export { path } => commands::route::handle_export(&ctx, path),
        Command::Clear { yes } => commands::route::handle_clear(&mut ctx, yes),
    }
}

/// Exit status when the routing service failed or refused the route.
const REMOTE_FAILURE: u8 = 2;

/// Print the short message for library errors, the full chain for anything else.
///
/// Routing service failures exit with [`REMOTE_FAILURE`], everything else with 1.
fn report(err: &anyhow::Error) -> ExitCode {
    let palette = ColorPalette::detect();
    tracing::debug!(error = ?err, "command failed");
    let Some(lib_err) = err.downcast_ref::<LibError>() else {
        eprintln!("{}error:{} {:#}", palette.red, palette.reset, err);
        return ExitCode::FAILURE;
    };

    eprintln!("{}error:{} {}", palette.red, palette.reset, lib_err.user_message());
    if let LibError::RouteRejected {
        source_system,
        destination_system,
        ..
    } = lib_err
    {
        if let Some(hint) = rejection_hint(*source_system, *destination_system) {
            eprintln!("{}hint:{} {}", palette.gray, palette.reset, hint);
        }
    }

    if lib_err.is_remote() {
        ExitCode::from(REMOTE_FAILURE)
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
