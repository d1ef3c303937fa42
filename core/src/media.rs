//! Local media files and the MIME type sent for them.

use std::path::Path;

use mime::Mime;

use crate::error::ApiError;
use crate::types::MediaKind;

/// A local file loaded for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as the
    /// upload file name.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ApiError::Io(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    pub fn mime_type(&self, kind: MediaKind) -> Mime {
        mime_for(kind, self.extension().as_deref())
    }
}

/// MIME type for an upload part, from the media kind and file extension.
pub fn mime_for(kind: MediaKind, extension: Option<&str>) -> Mime {
    let ext = extension.map(str::to_ascii_lowercase);
    let essence = match (kind, ext.as_deref()) {
        (MediaKind::Image, Some("png")) => "image/png",
        (MediaKind::Image, Some("gif")) => "image/gif",
        (MediaKind::Image, Some("webp")) => "image/webp",
        (MediaKind::Image, Some("heic")) => "image/heic",
        (MediaKind::Image, _) => "image/jpeg",
        (MediaKind::Video, Some("mov")) => "video/quicktime",
        (MediaKind::Video, Some("webm")) => "video/webm",
        (MediaKind::Video, Some("m4v")) => "video/x-m4v",
        (MediaKind::Video, _) => "video/mp4",
        (MediaKind::Other, Some("pdf")) => "application/pdf",
        (MediaKind::Other, Some("txt")) => "text/plain",
        (MediaKind::Other, _) => "application/octet-stream",
    };
    essence.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}
