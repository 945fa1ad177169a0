/// In-process photo store for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{check_name, public_url, PhotoStore, StorageError};

/// Mutex-guarded map implementing [`PhotoStore`]
#[derive(Debug)]
pub struct InMemoryPhotoStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
    public_base: String,
}

impl InMemoryPhotoStore {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            public_base: public_base.into(),
        }
    }

    /// Contents stored under `name`
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PhotoStore for InMemoryPhotoStore {
    async fn save(&self, name: &str, data: &[u8]) -> Result<String, StorageError> {
        check_name(name)?;

        self.files
            .lock()
            .map_err(|_| StorageError::Io(std::io::Error::other("photo store lock poisoned")))?
            .insert(name.to_string(), data.to_vec());

        Ok(public_url(&self.public_base, name))
    }
}
