//! Input acquisition
//!
//! Normalizes the three capture paths (file selection, clipboard paste, raw
//! design text) into a single [`InputModality`] value. Every setter goes
//! through [`InputSurface::replace`], so at most one modality is ever active
//! and any outgoing image preview is revoked before the next one is issued.

use crate::ai::mime;
use crate::Result;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

const PREVIEW_SCHEME: &str = "blob:design2code/";

/// Raw bytes behind an image handle.
#[derive(Clone, PartialEq)]
pub enum ImageBlob {
    /// Pasted data, already in memory.
    Memory(Vec<u8>),
    /// A selected file, read lazily when the image is encoded.
    File(PathBuf),
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            Self::File(path) => write!(f, "File({})", path.display()),
        }
    }
}

/// Transient, locally generated reference used to display an image preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tracks which preview references are still live.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: HashSet<PreviewUrl>,
}

impl PreviewRegistry {
    pub fn create(&mut self) -> PreviewUrl {
        let url = PreviewUrl(format!("{}{}", PREVIEW_SCHEME, Uuid::new_v4()));
        self.live.insert(url.clone());
        url
    }

    pub fn revoke(&mut self, url: &PreviewUrl) -> bool {
        self.live.remove(url)
    }

    pub fn is_live(&self, url: &PreviewUrl) -> bool {
        self.live.contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

/// In-memory reference to an image plus its preview.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub blob: ImageBlob,
    /// Content type reported by the source, if any.
    pub declared_mime: Option<String>,
    pub preview: PreviewUrl,
}

/// The single active input. Setting one variant replaces the other.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputModality {
    #[default]
    None,
    StructuredText(String),
    Image(ImageHandle),
}

impl InputModality {
    /// True when there is nothing to convert.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::StructuredText(text) => text.trim().is_empty(),
            Self::Image(_) => false,
        }
    }
}

/// A file chosen by the user.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub mime: Option<String>,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// One entry of a paste event.
#[derive(Debug, Clone)]
pub struct ClipboardItem {
    pub mime: String,
    pub data: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }
}

/// What the host should do with a paste event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// An image was captured; suppress the default paste-as-text behavior.
    ImageCaptured,
    /// No image present; the host handles the paste as ordinary text.
    Passthrough,
}

#[derive(Debug, Default)]
pub struct InputSurface {
    modality: InputModality,
    previews: PreviewRegistry,
}

impl InputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modality(&self) -> &InputModality {
        &self.modality
    }

    pub fn preview(&self) -> Option<&PreviewUrl> {
        match &self.modality {
            InputModality::Image(handle) => Some(&handle.preview),
            _ => None,
        }
    }

    pub fn live_previews(&self) -> usize {
        self.previews.live_count()
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        info!("Selected image file: {}", file.path.display());
        self.set_image(ImageBlob::File(file.path), file.mime);
    }

    /// Capture the first image entry of a paste event, if any.
    pub fn paste_clipboard_items(&mut self, items: Vec<ClipboardItem>) -> PasteOutcome {
        let mut items = items.into_iter();
        let Some(image) = items.by_ref().find(|item| {
            let is_image = mime::is_image_mime(&item.mime);
            if !is_image {
                debug!("Skipping non-image clipboard entry ({})", item.mime);
            }
            is_image
        }) else {
            return PasteOutcome::Passthrough;
        };

        let ignored = items.filter(|item| mime::is_image_mime(&item.mime)).count();
        if ignored > 0 {
            warn!("Ignoring {} additional pasted image(s); first image wins", ignored);
        }

        info!("Captured pasted image ({}, {} bytes)", image.mime, image.data.len());
        self.set_image(ImageBlob::Memory(image.data), Some(image.mime));
        PasteOutcome::ImageCaptured
    }

    /// Most recent set wins: text replaces any active image.
    /// Blank text resets the surface to [`InputModality::None`].
    pub fn set_structured_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            self.replace(InputModality::None);
        } else {
            self.replace(InputModality::StructuredText(text));
        }
    }

    pub fn clear(&mut self) {
        self.replace(InputModality::None);
    }

    fn set_image(&mut self, blob: ImageBlob, declared_mime: Option<String>) {
        // The old preview must be revoked before the new one is created.
        self.replace(InputModality::None);
        let preview = self.previews.create();
        self.modality = InputModality::Image(ImageHandle {
            blob,
            declared_mime,
            preview,
        });
    }

    fn replace(&mut self, next: InputModality) {
        let previous = std::mem::replace(&mut self.modality, next);
        if let InputModality::Image(handle) = previous {
            if self.previews.revoke(&handle.preview) {
                debug!("Revoked preview {}", handle.preview);
            }
        }
    }
}

/// Read a design-tool export (e.g. JSON) as structured text.
pub async fn read_design_export(path: &Path) -> Result<String> {
    let content = tokio::fs::read_to_string(path).await?;
    debug!("Read design export {} ({} bytes)", path.display(), content.len());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PNG_BYTES: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

    #[test]
    fn test_new_surface_is_empty() {
        let surface = InputSurface::new();
        assert!(surface.modality().is_empty());
        assert!(surface.preview().is_none());
        assert_eq!(surface.live_previews(), 0);
    }

    #[test]
    fn test_select_file_sets_image_with_preview() {
        let mut surface = InputSurface::new();
        surface.select_file(SelectedFile::new("design.png").with_mime("image/png"));

        match surface.modality() {
            InputModality::Image(handle) => {
                assert_eq!(handle.blob, ImageBlob::File(PathBuf::from("design.png")));
                assert_eq!(handle.declared_mime.as_deref(), Some("image/png"));
                assert!(handle.preview.as_str().starts_with("blob:design2code/"));
            }
            other => panic!("expected image, got {:?}", other),
        }
        assert_eq!(surface.live_previews(), 1);
    }

    #[test]
    fn test_text_after_image_clears_image() {
        let mut surface = InputSurface::new();
        surface.select_file(SelectedFile::new("design.png"));
        surface.set_structured_text("x");

        assert_eq!(
            surface.modality(),
            &InputModality::StructuredText("x".to_string())
        );
        assert_eq!(surface.live_previews(), 0);
    }

    #[test]
    fn test_image_after_text_clears_text() {
        let mut surface = InputSurface::new();
        surface.set_structured_text("{\"type\":\"FRAME\"}");
        surface.select_file(SelectedFile::new("design.png"));

        assert!(matches!(surface.modality(), InputModality::Image(_)));
    }

    #[test]
    fn test_replacing_image_revokes_previous_preview() {
        let mut surface = InputSurface::new();
        surface.select_file(SelectedFile::new("a.png"));
        let first = surface.preview().cloned().unwrap();

        surface.select_file(SelectedFile::new("b.png"));
        let second = surface.preview().cloned().unwrap();

        assert_ne!(first, second);
        assert!(!surface.previews.is_live(&first));
        assert!(surface.previews.is_live(&second));
        assert_eq!(surface.live_previews(), 1);
    }

    #[test]
    fn test_paste_first_image_wins() {
        let mut surface = InputSurface::new();
        let outcome = surface.paste_clipboard_items(vec![
            ClipboardItem::new("text/plain", b"hello".to_vec()),
            ClipboardItem::new("image/png", PNG_BYTES.to_vec()),
            ClipboardItem::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]),
        ]);

        assert_eq!(outcome, PasteOutcome::ImageCaptured);
        match surface.modality() {
            InputModality::Image(handle) => {
                assert_eq!(handle.blob, ImageBlob::Memory(PNG_BYTES.to_vec()));
                assert_eq!(handle.declared_mime.as_deref(), Some("image/png"));
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_paste_without_image_passes_through() {
        let mut surface = InputSurface::new();
        surface.set_structured_text("existing");

        let outcome =
            surface.paste_clipboard_items(vec![ClipboardItem::new("text/plain", b"hi".to_vec())]);

        assert_eq!(outcome, PasteOutcome::Passthrough);
        assert_eq!(
            surface.modality(),
            &InputModality::StructuredText("existing".to_string())
        );
    }

    #[test]
    fn test_paste_image_clears_text() {
        let mut surface = InputSurface::new();
        surface.set_structured_text("{}");
        surface.paste_clipboard_items(vec![ClipboardItem::new("image/png", PNG_BYTES.to_vec())]);
        assert!(matches!(surface.modality(), InputModality::Image(_)));
    }

    #[test]
    fn test_blank_text_resets_to_none() {
        let mut surface = InputSurface::new();
        surface.select_file(SelectedFile::new("a.png"));
        surface.set_structured_text("   \n");

        assert!(surface.modality().is_empty());
        assert_eq!(surface.live_previews(), 0);
    }

    #[test]
    fn test_clear_revokes_preview() {
        let mut surface = InputSurface::new();
        surface.select_file(SelectedFile::new("a.png"));
        surface.clear();

        assert!(surface.modality().is_empty());
        assert_eq!(surface.live_previews(), 0);
    }

    #[test]
    fn test_image_blob_debug_hides_bytes() {
        let blob = ImageBlob::Memory(vec![0; 2048]);
        assert_eq!(format!("{:?}", blob), "Memory(2048 bytes)");
    }

    #[tokio::test]
    async fn test_read_design_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.json");
        std::fs::write(&path, "{\"name\":\"Card\"}").unwrap();

        let content = read_design_export(&path).await.unwrap();
        assert_eq!(content, "{\"name\":\"Card\"}");
    }

    #[tokio::test]
    async fn test_read_design_export_missing_file() {
        let err = read_design_export(Path::new("/nonexistent/frame.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
