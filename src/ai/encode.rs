//! Binary-to-text encoding of image handles into `data:` URLs.

use super::mime;
use crate::input::{ImageBlob, ImageHandle};
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use tracing::debug;

/// A `data:<mime>;base64,<payload>` string. Recomputed per request.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    mime: String,
    data_url: String,
}

impl EncodedImage {
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        let payload = STANDARD.encode(bytes);
        Self {
            mime: mime.to_string(),
            data_url: format!("data:{};base64,{}", mime, payload),
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn as_str(&self) -> &str {
        &self.data_url
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data_url)
    }
}

/// `type/subtype` with parameters removed, e.g. `image/png; name=a.png` -> `image/png`.
fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or(mime)
        .trim()
        .to_ascii_lowercase()
}

/// Read the handle's payload and encode it.
///
/// Selected files are read here, which is the pipeline's only suspension
/// point besides the network call. The declared MIME type wins when it names
/// an image; otherwise the type is sniffed from the payload.
pub async fn encode(handle: &ImageHandle) -> Result<EncodedImage> {
    let bytes = match &handle.blob {
        ImageBlob::Memory(bytes) => bytes.clone(),
        ImageBlob::File(path) => tokio::fs::read(path).await.map_err(|e| {
            Error::Encoding(format!("could not read {}: {}", path.display(), e))
        })?,
    };

    if bytes.is_empty() {
        return Err(Error::Encoding("image payload is empty".to_string()));
    }

    let mime = handle
        .declared_mime
        .as_deref()
        .filter(|m| mime::is_image_mime(m))
        .map(essence)
        .or_else(|| mime::sniff_image_mime(&bytes).map(str::to_string))
        .ok_or_else(|| Error::Encoding("unsupported image format".to_string()))?;

    let encoded = EncodedImage::from_bytes(&bytes, &mime);
    debug!(
        "Encoded {} image: {} bytes -> {} chars",
        mime,
        bytes.len(),
        encoded.as_str().len()
    );
    Ok(encoded)
}
