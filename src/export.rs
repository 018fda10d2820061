//! Export of generated code to the system clipboard.

use crate::{Error, Result};

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Clipboard of the running desktop session.
///
/// On Linux the contents are handed to a clipboard manager, if one is
/// running, when the handle is dropped.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}

/// Place generated code on the clipboard. Empty code is rejected.
pub fn copy_code(code: &str, clipboard: &mut dyn ClipboardWriter) -> Result<()> {
    if code.trim().is_empty() {
        return Err(Error::Clipboard("nothing to copy".to_string()));
    }
    clipboard.write_text(code)?;
    tracing::info!("Copied {} chars of generated code to the clipboard", code.len());
    Ok(())
}
