// Subcommand handlers.
//
// main.rs parses arguments and builds a `Context`; each module here takes it
// from there and renders the result.

pub mod navigate;
pub mod route;

use anyhow::Result;

use edroute_cli::clipboard::{copy_system, ClipboardSink};
use edroute_cli::output::OutputFormat;
use edroute_lib::{Session, WaypointView};

/// State shared by every subcommand.
pub struct Context {
    pub session: Session,
    pub format: OutputFormat,
    pub clipboard: Box<dyn ClipboardSink>,
    pub current_system: Option<String>,
    pub api_base: Option<String>,
}

impl Context {
    /// Put the next stop on the clipboard.
    pub fn copy_next_stop(&mut self) -> bool {
        let system = self.session.next_stop().map(str::to_owned);
        copy_system(self.clipboard.as_mut(), system.as_deref())
    }

    /// Render `view` after a change of position, copying the new next stop.
    pub fn show_moved(&mut self, view: &WaypointView) -> Result<()> {
        self.copy_next_stop();
        self.format.render_view(view)?;
        Ok(())
    }
}
