//! Profile-picture storage
//!
//! Writes uploaded images under a publicly served directory and hands back
//! the public path recorded on the employee record. Filenames combine a
//! millisecond timestamp with a random suffix so concurrent uploads never
//! collide.
//!
//! Policy: images only, by extension and declared content type, capped at a
//! configured byte size.

use crate::core::error::{Result, StaffdeskError};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Public URL prefix under which stored files are served
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Extensions accepted for profile pictures
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Store for uploaded profile pictures
pub struct UploadStore {
    root: PathBuf,
    max_bytes: u64,
}

impl UploadStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: &Path, max_bytes: u64) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(StaffdeskError::IoError)?;
        Ok(Self {
            root: root.to_path_buf(),
            max_bytes,
        })
    }

    /// Directory files are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maximum accepted file size in bytes
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validate and persist one uploaded image, returning its public path
    pub async fn save(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<String> {
        if data.is_empty() {
            return Err(StaffdeskError::ValidationError(
                "Uploaded file is empty".to_string(),
            ));
        }

        if data.len() as u64 > self.max_bytes {
            return Err(StaffdeskError::ValidationError(format!(
                "Uploaded file exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let extension = extension_of(original_name)?;

        // The declared content type and the extension must agree on "image"
        if let Some(declared) = content_type {
            if !declared.starts_with("image/") {
                return Err(StaffdeskError::ValidationError(format!(
                    "Unsupported content type '{}' for profile picture",
                    declared
                )));
            }
        }
        let guessed = mime_guess::from_ext(&extension).first_or_octet_stream();
        if guessed.type_() != mime_guess::mime::IMAGE {
            return Err(StaffdeskError::ValidationError(format!(
                "Unsupported file extension '.{}'",
                extension
            )));
        }

        let filename = format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            rand::random::<u32>(),
            extension
        );
        let path = self.root.join(&filename);

        tokio::fs::write(&path, &data).await.map_err(StaffdeskError::IoError)?;

        tracing::debug!(file = %filename, bytes = data.len(), "Stored profile picture");

        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }
}

/// Lower-cased extension of the original filename, if allowed
fn extension_of(original_name: &str) -> Result<String> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            StaffdeskError::ValidationError(
                "Profile picture must have a file extension".to_string(),
            )
        })?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(StaffdeskError::ValidationError(format!(
            "Unsupported file extension '.{}'",
            extension
        )));
    }

    Ok(extension)
}
