/// Image data structures for the edit session
///
/// These structs carry image bytes between the input layer, the
/// edit service, and the UI. Each owns its buffer; the renderable
/// handle shares it with the renderer and is released on drop.
use bytes::Bytes;
use iced::widget::image::Handle;
use image::ImageFormat;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::EditError;

/// Formats accepted for upload (matches the file picker filter)
pub const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// Extensions offered by the file picker
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// A user-selected image that has not been submitted yet
#[derive(Clone)]
pub struct PendingImage {
    /// Filename only (e.g., "beach.jpg"), sent as the multipart file name
    pub file_name: String,
    /// Detected format of the file content
    pub format: ImageFormat,
    /// Raw file content, uploaded as-is
    pub bytes: Bytes,
    /// Renderable preview, sharing `bytes`
    pub handle: Handle,
}

impl PendingImage {
    /// Load and validate an image file selected by the user
    ///
    /// The file must be readable, at most `max_bytes` long, and its content
    /// must be one of the supported image formats.
    pub fn load(path: &Path, max_bytes: u64) -> Result<Self, EditError> {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let metadata = std::fs::metadata(path)
            .map_err(|e| EditError::Validation(format!("Could not read {}: {}", file_name, e)))?;

        if !metadata.is_file() {
            return Err(EditError::Validation(format!("{} is not a file.", file_name)));
        }

        if metadata.len() > max_bytes {
            return Err(EditError::Validation(format!(
                "{} is larger than {}.",
                file_name,
                format_size(max_bytes)
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| EditError::Validation(format!("Could not read {}: {}", file_name, e)))?;

        Self::from_bytes(file_name, bytes)
    }

    /// Build a pending image from in-memory content
    pub fn from_bytes(file_name: String, bytes: Vec<u8>) -> Result<Self, EditError> {
        let format = image::guess_format(&bytes)
            .ok()
            .filter(|format| SUPPORTED_FORMATS.contains(format))
            .ok_or_else(|| {
                EditError::Validation(format!(
                    "{} is not a supported image (PNG, JPG, GIF, WEBP, BMP).",
                    file_name
                ))
            })?;

        let bytes = Bytes::from(bytes);
        let handle = Handle::from_bytes(bytes.clone());

        Ok(Self {
            file_name,
            format,
            bytes,
            handle,
        })
    }

    /// MIME type for the multipart file part
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

impl fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingImage")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A result produced by the edit service
#[derive(Clone)]
pub struct EditedImage {
    pub format: ImageFormat,
    pub bytes: Bytes,
    /// Renderable result, sharing `bytes`
    pub handle: Handle,
    /// Where the result was cached on disk, if saving succeeded
    pub saved_to: Option<PathBuf>,
}

impl EditedImage {
    /// Decode a service response body into a renderable result
    pub fn decode(bytes: impl Into<Bytes>) -> Result<Self, EditError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(EditError::MalformedResponse("empty body".to_string()));
        }

        let format = image::guess_format(&bytes)
            .map_err(|e| EditError::MalformedResponse(e.to_string()))?;

        let handle = Handle::from_bytes(bytes.clone());

        Ok(Self {
            format,
            bytes,
            handle,
            saved_to: None,
        })
    }

    /// Reload a previously cached result
    ///
    /// Returns `None` if the file is gone or no longer an image.
    pub fn restore(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        let mut image = Self::decode(bytes).ok()?;
        image.saved_to = Some(path.to_path_buf());
        Some(image)
    }

    /// File extension matching the detected format
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

impl PartialEq for EditedImage {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes && self.saved_to == other.saved_to
    }
}

impl fmt::Debug for EditedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditedImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .field("saved_to", &self.saved_to)
            .finish()
    }
}

fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{} bytes", bytes)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_pending_from_png() {
        let pending = PendingImage::from_bytes("a.png".into(), png_bytes(1)).unwrap();
        assert_eq!(pending.format, ImageFormat::Png);
        assert_eq!(pending.mime_type(), "image/png");
    }

    #[test]
    fn test_pending_rejects_non_image() {
        let err = PendingImage::from_bytes("notes.txt".into(), b"hello world".to_vec()).unwrap_err();
        assert!(matches!(err, EditError::Validation(_)));
        assert!(err.to_string().starts_with("notes.txt is not a supported image"));
    }

    #[test]
    fn test_load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        let mut bytes = jpeg_bytes();
        bytes.resize(2048, 0);
        std::fs::write(&path, &bytes).unwrap();

        let err = PendingImage::load(&path, 1024).unwrap_err();
        assert_eq!(err.to_string(), "big.jpg is larger than 1024 bytes.");

        let ok = PendingImage::load(&path, 10 * 1024 * 1024).unwrap();
        assert_eq!(ok.format, ImageFormat::Jpeg);
        assert_eq!(ok.file_name, "big.jpg");
    }

    #[test]
    fn test_load_missing_file() {
        let err = PendingImage::load(Path::new("/nonexistent/photo.png"), 1024).unwrap_err();
        assert!(err.to_string().starts_with("Could not read photo.png"));
    }

    #[test]
    fn test_edited_decode() {
        let edited = EditedImage::decode(png_bytes(7)).unwrap();
        assert_eq!(edited.extension(), "png");
        assert!(edited.saved_to.is_none());

        assert!(matches!(
            EditedImage::decode(Vec::<u8>::new()),
            Err(EditError::MalformedResponse(_))
        ));
        assert!(matches!(
            EditedImage::decode(b"<html>oops</html>".to_vec()),
            Err(EditError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_handle_shares_buffer() {
        let shares = |handle: &Handle, bytes: &Bytes| match handle {
            Handle::Bytes(_, data) => data.as_ptr() == bytes.as_ptr(),
            _ => false,
        };

        let pending = PendingImage::from_bytes("a.png".into(), png_bytes(1)).unwrap();
        assert!(shares(&pending.handle, &pending.bytes));

        let edited = EditedImage::decode(png_bytes(2)).unwrap();
        assert!(shares(&edited.handle, &edited.bytes));

        let copy = edited.clone();
        assert_eq!(copy.bytes.as_ptr(), edited.bytes.as_ptr());
    }

    #[test]
    fn test_restore_missing_file() {
        assert!(EditedImage::restore(Path::new("/nonexistent/result.png")).is_none());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(10 * 1024 * 1024), "10MB");
        assert_eq!(format_size(1500), "1500 bytes");
    }
}
