//! Clipboard access for putting the next stop where the galaxy map search box
//! can paste it.

use anyhow::Result;

/// Somewhere to put copied text.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

#[cfg(not(feature = "clipboard"))]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        anyhow::bail!("clipboard support was not compiled in")
    }
}

/// Sink that drops everything, used with `--no-copy`.
#[derive(Debug, Default)]
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Copy `system` if there is one, logging rather than failing when the
/// clipboard is unavailable. Returns whether anything was copied.
pub fn copy_system(sink: &mut dyn ClipboardSink, system: Option<&str>) -> bool {
    let Some(system) = system else {
        return false;
    };
    match sink.set_text(system) {
        Ok(()) => {
            tracing::debug!(%system, "copied next stop to clipboard");
            true
        }
        Err(err) => {
            tracing::warn!(%system, error = %err, "failed to copy next stop to clipboard");
            false
        }
    }
}
