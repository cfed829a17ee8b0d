//! Handlers that move along the current route or report on it.

use anyhow::Result;
use tracing::info;

use super::Context;

/// Handle the next subcommand.
///
/// At the last stop nothing changes and the current state is shown again.
pub fn handle_next(ctx: &mut Context) -> Result<()> {
    match ctx.session.advance() {
        Some(view) => ctx.show_moved(&view),
        None => {
            info!("already at the last stop");
            ctx.format.render_view(&ctx.session.view())?;
            Ok(())
        }
    }
}

/// Handle the prev subcommand.
pub fn handle_prev(ctx: &mut Context) -> Result<()> {
    match ctx.session.retreat() {
        Some(view) => ctx.show_moved(&view),
        None => {
            info!("already at the first stop");
            ctx.format.render_view(&ctx.session.view())?;
            Ok(())
        }
    }
}

pub fn handle_status(ctx: &Context) -> Result<()> {
    ctx.format.render_view(&ctx.session.view())?;
    Ok(())
}

/// Handle the copy subcommand.
pub fn handle_copy(ctx: &mut Context) -> Result<()> {
    let Some(system) = ctx.session.next_stop().map(str::to_owned) else {
        ctx.format.render_notice("empty", "Nothing to copy", None)?;
        return Ok(());
    };
    if ctx.copy_next_stop() {
        ctx.format.render_notice("copied", &format!("Copied {system}"), None)?;
    } else {
        ctx.format.render_notice("failed", "Could not access the clipboard", None)?;
    }
    Ok(())
}
