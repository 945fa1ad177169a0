/// Profile photo uploads
///
/// Accepts PNG, JPEG, GIF or WebP bytes up to a size limit, stores them under
/// a fresh random name and points the user's `photo_url` at the result.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::user::UpdateUser;
use crate::repository::UserRepository;
use crate::storage::{image_extension, PhotoStore};

/// Default upload limit (5 MiB)
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

const FILE_REQUIRED: &str = "Arquivo obrigatório";
const UNSUPPORTED_FORMAT: &str = "Formato de imagem não suportado";
const FILE_TOO_LARGE: &str = "Arquivo muito grande";
const USER_NOT_FOUND: &str = "Usuário não encontrado";

/// Photo upload service
pub struct PhotoService {
    store: Arc<dyn PhotoStore>,
    users: Arc<dyn UserRepository>,
    max_bytes: usize,
}

impl PhotoService {
    pub fn new(store: Arc<dyn PhotoStore>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            store,
            users,
            max_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Stores a photo for `user_id` and returns its URL
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty, oversized or non-image upload
    /// - `NotFound` if the user no longer exists
    /// - `Internal` if the store fails
    pub async fn upload(
        &self,
        user_id: Uuid,
        content_type: Option<&str>,
        data: &[u8],
    ) -> ServiceResult<String> {
        if data.is_empty() {
            return Err(ServiceError::Validation(FILE_REQUIRED.to_string()));
        }
        if data.len() > self.max_bytes {
            return Err(ServiceError::Validation(FILE_TOO_LARGE.to_string()));
        }
        let extension = content_type
            .and_then(image_extension)
            .ok_or_else(|| ServiceError::Validation(UNSUPPORTED_FORMAT.to_string()))?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::NotFound(USER_NOT_FOUND.to_string()));
        }

        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let url = self.store.save(&name, data).await?;

        self.users
            .update(
                user_id,
                UpdateUser {
                    photo_url: Some(Some(url.clone())),
                    ..UpdateUser::default()
                },
            )
            .await?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))?;

        tracing::info!(user_id = %user_id, file = %name, "Profile photo uploaded");
        Ok(url)
    }
}
