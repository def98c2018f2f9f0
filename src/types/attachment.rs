use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// An image staged for upload alongside a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// File name reported to the backend.
    pub file_name: String,

    /// MIME type of the image bytes.
    pub mime_type: String,

    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Create a new `ImageAttachment` from in-memory bytes.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads an attachment from disk, deriving the MIME type from the file
    /// extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| {
            Error::io(
                format!("failed to read attachment {}", path.display()),
                err,
            )
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();
        Ok(Self {
            mime_type: mime_for(path).to_string(),
            file_name,
            bytes,
        })
    }

    /// Size of the attachment in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the attachment is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(&PathBuf::from("scan.png")), "image/png");
        assert_eq!(mime_for(&PathBuf::from("photo.JPG")), "image/jpeg");
        assert_eq!(mime_for(&PathBuf::from("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for(&PathBuf::from("clip.gif")), "image/gif");
        assert_eq!(
            mime_for(&PathBuf::from("unknown.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            mime_for(&PathBuf::from("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ImageAttachment::from_path("/nonexistent/image.png").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn constructor_keeps_bytes() {
        let attachment = ImageAttachment::new("x.png", "image/png", vec![0xff, 0xd8]);
        assert_eq!(attachment.len(), 2);
        assert!(!attachment.is_empty());
    }
}
