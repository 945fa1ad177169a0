/// Profile photo storage
///
/// Uploaded photos are written under a generated file name and addressed by a
/// public URL. [`LocalPhotoStore`] keeps them on disk for the API to serve;
/// [`InMemoryPhotoStore`] backs the tests.
///
/// # Example
///
/// ```
/// use taskboard_shared::storage::{InMemoryPhotoStore, PhotoStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryPhotoStore::new("http://localhost:3000/uploads");
/// let url = store.save("avatar.png", b"\x89PNG").await?;
/// assert_eq!(url, "http://localhost:3000/uploads/avatar.png");
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

pub mod local;
pub mod memory;

pub use local::LocalPhotoStore;
pub use memory::InMemoryPhotoStore;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Name that would escape the storage root
    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

/// Write-once blob store addressed by file name
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Stores `data` as `name` and returns its public URL
    async fn save(&self, name: &str, data: &[u8]) -> Result<String, StorageError>;
}

/// File extension for an accepted image content type
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

pub(crate) fn check_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

pub(crate) fn public_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("IMAGE/JPEG"), Some("jpg"));
        assert_eq!(image_extension("image/webp"), Some("webp"));
        assert_eq!(image_extension("text/html"), None);
        assert_eq!(image_extension("image/svg+xml"), None);
    }

    #[test]
    fn test_check_name() {
        assert!(check_name("3f2a.png").is_ok());
        assert!(check_name("../etc/passwd").is_err());
        assert!(check_name("a/b.png").is_err());
        assert!(check_name(".hidden").is_err());
        assert!(check_name("").is_err());
    }

    #[test]
    fn test_public_url_joins_once() {
        assert_eq!(public_url("http://h/uploads/", "a.png"), "http://h/uploads/a.png");
        assert_eq!(public_url("/uploads", "a.png"), "/uploads/a.png");
    }
}
