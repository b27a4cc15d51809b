use std::fmt::Display;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::{HttpResponse, web};
use futures_util::{Stream, StreamExt};
use serde_json::json;

use crate::config::AppConfig;
use crate::uploader::service::{FileUpload, MAX_IMAGE_BYTES, UploadService};
use crate::utils::error::CustomError;
use crate::utils::helpers::success_response;

/// Reads the first `file` field of the multipart body.
async fn extract_image(mut payload: Multipart) -> Result<Option<FileUpload>, CustomError> {
    while let Some(item) = payload.next().await {
        let field = item.map_err(|e| {
            CustomError::ValidationError(format!("Error reading multipart field: {}", e))
        })?;

        let content_disposition = match field.content_disposition() {
            Some(cd) => cd,
            None => continue,
        };
        if content_disposition.get_name() != Some("file") {
            continue;
        }

        let file_name = content_disposition
            .get_filename()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let data = read_limited(field, MAX_IMAGE_BYTES).await?;
        return Ok(Some(FileUpload::new(file_name, data)));
    }

    Ok(None)
}

/// Collects a field's chunks, failing as soon as the total passes `max_bytes`.
async fn read_limited<S, E>(mut chunks: S, max_bytes: usize) -> Result<Vec<u8>, CustomError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut data = Vec::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|e| {
            CustomError::ValidationError(format!("Error reading file chunk: {}", e))
        })?;
        if data.len() + chunk.len() > max_bytes {
            return Err(CustomError::ValidationError(format!(
                "Image exceeds the {} byte limit",
                max_bytes
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Upload an image and return its public URL for use as a post's `image_url`
/// POST /uploads/image
pub async fn upload_image(
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, CustomError> {
    let cloudinary = config.cloudinary.clone().ok_or_else(|| {
        CustomError::InfrastructureError("Image uploads are not configured".to_string())
    })?;

    let file = extract_image(payload)
        .await?
        .ok_or_else(|| CustomError::ValidationError("No file provided".to_string()))?;

    let url = UploadService::new(cloudinary).upload_image(file).await?;

    Ok(success_response(
        StatusCode::CREATED,
        "Image uploaded successfully",
        json!({ "url": url }),
    ))
}
