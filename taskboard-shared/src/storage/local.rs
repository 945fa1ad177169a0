/// Filesystem photo store
///
/// Files land in a single flat directory, created on first write. The API
/// serves that directory under the configured public base URL.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{check_name, public_url, PhotoStore, StorageError};

/// [`PhotoStore`] writing to a local directory
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    root: PathBuf,
    public_base: String,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn save(&self, name: &str, data: &[u8]) -> Result<String, StorageError> {
        check_name(name)?;

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(name), data).await?;

        tracing::debug!(file = %name, bytes = data.len(), "Photo stored");
        Ok(public_url(&self.public_base, name))
    }
}
