//! Avatar image storage on local disk.
//!
//! Uploaded images land under the configured upload directory and are
//! served back by the static file layer. Stored paths are relative, so the
//! serving prefix can change without rewriting rows.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use harvest_roster_core::MemberId;

/// Accepted image file extensions.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Errors from avatar storage.
#[derive(Debug, Error)]
pub enum AvatarError {
    /// File extension is missing or not an accepted image type.
    #[error("unsupported image type")]
    UnsupportedType,

    /// Filesystem write failed.
    #[error("avatar write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes avatar images under a root directory.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    root: PathBuf,
}

impl AvatarStore {
    /// Fallback avatar for members who never uploaded an image. A hosted
    /// URL, so it resolves without any local asset on disk.
    pub const DEFAULT_AVATAR: &'static str = "https://i.ibb.co/4pDNDk1/avatar.png";

    /// Create a store rooted at the given directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Persist an uploaded avatar and return its stored relative path.
    ///
    /// The stored name is derived from the member ID and upload time; the
    /// client-supplied file name only contributes its extension.
    ///
    /// # Errors
    ///
    /// Returns `AvatarError::UnsupportedType` for non-image uploads and
    /// `AvatarError::Io` when the write fails.
    pub async fn save(
        &self,
        member: MemberId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, AvatarError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or(AvatarError::UnsupportedType)?;

        let stored_name = format!("member-{member}-{}.{extension}", Utc::now().timestamp());

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&stored_name), bytes).await?;

        Ok(format!("uploads/{stored_name}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> AvatarStore {
        AvatarStore::new(&std::env::temp_dir().join("roster-avatar-tests"))
    }

    #[tokio::test]
    async fn test_save_rejects_unsupported_extension() {
        let store = temp_store();
        let result = store.save(MemberId::new(1), "payload.exe", b"MZ").await;
        assert!(matches!(result, Err(AvatarError::UnsupportedType)));
    }

    #[tokio::test]
    async fn test_save_rejects_missing_extension() {
        let store = temp_store();
        let result = store.save(MemberId::new(1), "avatar", b"...").await;
        assert!(matches!(result, Err(AvatarError::UnsupportedType)));
    }

    #[tokio::test]
    async fn test_save_writes_image_and_returns_relative_path() {
        let store = temp_store();
        let path = store
            .save(MemberId::new(42), "photo.PNG", b"fake-png-bytes")
            .await
            .unwrap();
        assert!(path.starts_with("uploads/member-42-"));
        assert!(path.ends_with(".png"));
    }

    #[test]
    fn test_default_avatar_needs_no_local_asset() {
        assert!(AvatarStore::DEFAULT_AVATAR.starts_with("https://"));
    }
}
