//! Clipboard and image-file intake.
//!
//! Turns raw clipboard items or an image file into note content: images
//! become `data:` URIs, text is taken as-is.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use canvas::doc::PartialNote;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard holds no image or text")]
    NothingUsable,
    #[error("unsupported file type: {0}")]
    Unsupported(String),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One representation offered by the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardItem {
    pub mime: String,
    pub data: Vec<u8>,
}

impl ClipboardItem {
    #[must_use]
    pub fn new(mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self { mime: mime.into(), data: data.into() }
    }

    /// Media type without parameters, lowercased.
    fn essence(&self) -> String {
        self.mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PasteContent {
    /// A `data:<mime>;base64,...` URI.
    Image(String),
    Text(String),
}

impl PasteContent {
    #[must_use]
    pub fn into_draft(self) -> PartialNote {
        match self {
            Self::Image(uri) | Self::Text(uri) => PartialNote::content(uri),
        }
    }
}

#[must_use]
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Pick what a paste should create: the first image item, else the first
/// non-blank plain-text item.
///
/// # Errors
///
/// Returns [`ClipboardError::NothingUsable`] if neither exists.
pub fn extract(items: &[ClipboardItem]) -> Result<PasteContent, ClipboardError> {
    if let Some(image) = items.iter().find(|item| item.essence().starts_with("image/")) {
        return Ok(PasteContent::Image(data_uri(&image.essence(), &image.data)));
    }

    items
        .iter()
        .filter(|item| item.essence() == "text/plain")
        .filter_map(|item| std::str::from_utf8(&item.data).ok())
        .find(|text| !text.trim().is_empty())
        .map(|text| PasteContent::Text(text.to_owned()))
        .ok_or(ClipboardError::NothingUsable)
}

/// Media type guessed from a file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "txt" | "text" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "json" => "application/json",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file and encode it as a `data:` URI.
///
/// # Errors
///
/// Returns [`ClipboardError::Unsupported`] for anything that isn't an image
/// by extension, or [`ClipboardError::Io`] if the file can't be read.
pub async fn read_image_file(path: &Path) -> Result<String, ClipboardError> {
    let mime = match mime_for_path(path) {
        Some(mime) if mime.starts_with("image/") => mime,
        Some(mime) => return Err(ClipboardError::Unsupported(mime.to_owned())),
        None => return Err(ClipboardError::Unsupported(path.display().to_string())),
    };
    let bytes = tokio::fs::read(path).await?;
    Ok(data_uri(mime, &bytes))
}

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod tests;
