/// Profile photo upload
///
/// # Endpoint
///
/// ```text
/// POST /profile/photo
/// Authorization: Bearer <access token>
/// Content-Type: multipart/form-data; boundary=...
///
/// file=<image bytes>
/// ```
///
/// # Response (200)
///
/// ```json
/// { "url": "http://localhost:3000/uploads/8d1f....png" }
/// ```
///
/// The stored URL also becomes the user's `photo`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::auth::middleware::AuthContext;

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

const FILE_REQUIRED: &str = "Arquivo obrigatório";
const UPLOAD_FAILED: &str = "Erro ao enviar foto";

/// Upload result
#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub url: String,
}

/// Store a new profile photo for the authenticated user
///
/// # Errors
///
/// - `400 Bad Request`: No `file` field, empty file, unsupported image type, malformed multipart
/// - `401 Unauthorized`: Missing or invalid token (from middleware)
/// - `404 Not Found`: The user no longer exists
/// - `413 Payload Too Large`: Body over the upload limit
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<PhotoResponse>> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        let url = state
            .photos
            .upload(auth.user_id, content_type.as_deref(), &data)
            .await
            .map_err(|e| ApiError::from(e).internal_message(UPLOAD_FAILED))?;

        return Ok(Json(PhotoResponse { url }));
    }

    Err(ApiError::BadRequest(FILE_REQUIRED.to_string()))
}
