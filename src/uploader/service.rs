use std::env;

use log::error;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::utils::error::CustomError;

/// Cloudinary configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_preset: Option<String>,
    pub folder: Option<String>,
}

impl CloudinaryConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .map_err(|_| "CLOUDINARY_CLOUD_NAME is required")?,
            api_key: env::var("CLOUDINARY_API_KEY")
                .map_err(|_| "CLOUDINARY_API_KEY is required")?,
            api_secret: env::var("CLOUDINARY_API_SECRET")
                .map_err(|_| "CLOUDINARY_API_SECRET is required")?,
            upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET").ok(),
            folder: env::var("CLOUDINARY_FOLDER").ok(),
        })
    }

    pub fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }

    /// Parameters covered by the signature, sorted by name.
    fn signed_params(&self, timestamp: i64) -> String {
        let mut params = vec![format!("timestamp={}", timestamp)];
        if let Some(folder) = &self.folder {
            params.push(format!("folder={}", folder));
        }
        if let Some(preset) = &self.upload_preset {
            params.push(format!("upload_preset={}", preset));
        }
        params.sort();
        params.join("&")
    }

    pub fn generate_signature(&self, timestamp: i64) -> String {
        let to_sign = format!("{}{}", self.signed_params(timestamp), self.api_secret);
        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorResponse {
    error: CloudinaryError,
}

/// An image received from a client.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: String, data: Vec<u8>) -> Self {
        Self { file_name, data }
    }

    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        Some(ext.to_lowercase())
    }
}

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn validate_image(file: &FileUpload) -> Result<(), CustomError> {
    let extension = file
        .extension()
        .ok_or_else(|| CustomError::ValidationError("File has no extension".to_string()))?;

    if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(CustomError::ValidationError(format!(
            "Invalid file type '{}'. Allowed types: {}",
            extension,
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )));
    }
    if file.data.is_empty() {
        return Err(CustomError::ValidationError("File is empty".to_string()));
    }
    if file.data.len() > MAX_IMAGE_BYTES {
        return Err(CustomError::ValidationError(format!(
            "File too large. Maximum size: {} bytes, file size: {} bytes",
            MAX_IMAGE_BYTES,
            file.data.len()
        )));
    }
    Ok(())
}

/// Signed uploads to Cloudinary. Returns the public URL of the stored image.
pub struct UploadService {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl UploadService {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn upload_image(&self, file: FileUpload) -> Result<String, CustomError> {
        validate_image(&file)?;

        let timestamp = chrono::Utc::now().timestamp();
        let signature = self.config.generate_signature(timestamp);

        let file_part = Part::bytes(file.data)
            .file_name(file.file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| upload_failure(format!("Failed to create file part: {}", e)))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);

        if let Some(folder) = &self.config.folder {
            form = form.text("folder", folder.clone());
        }
        if let Some(preset) = &self.config.upload_preset {
            form = form.text("upload_preset", preset.clone());
        }

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_failure(format!("Failed to send upload request: {}", e)))?;

        if response.status().is_success() {
            let uploaded = response
                .json::<CloudinaryUploadResponse>()
                .await
                .map_err(|e| upload_failure(format!("Failed to parse upload response: {}", e)))?;
            Ok(uploaded.secure_url)
        } else {
            let error_response = response
                .json::<CloudinaryErrorResponse>()
                .await
                .map_err(|e| upload_failure(format!("Failed to parse error response: {}", e)))?;
            Err(upload_failure(format!(
                "Cloudinary upload failed: {}",
                error_response.error.message
            )))
        }
    }
}

fn upload_failure(message: String) -> CustomError {
    error!("{}", message);
    CustomError::InfrastructureError(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            upload_preset: None,
            folder: None,
        }
    }

    #[test]
    fn signature_covers_sorted_params_and_secret() {
        let plain = config();
        let mut scoped = config();
        scoped.folder = Some("posts".to_string());

        let a = plain.generate_signature(1_700_000_000);
        assert_eq!(a.len(), 40);
        assert_eq!(a, plain.generate_signature(1_700_000_000));
        assert_ne!(a, scoped.generate_signature(1_700_000_000));
        assert_eq!(
            scoped.signed_params(1_700_000_000),
            "folder=posts&timestamp=1700000000"
        );
        assert_eq!(
            plain.upload_url(),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
    }

    #[test]
    fn image_validation() {
        let ok = FileUpload::new("cat.PNG".to_string(), vec![1; 2048]);
        assert!(validate_image(&ok).is_ok());

        let wrong_type = FileUpload::new("notes.pdf".to_string(), vec![1; 2048]);
        assert!(matches!(
            validate_image(&wrong_type),
            Err(CustomError::ValidationError(_))
        ));

        let no_extension = FileUpload::new("image".to_string(), vec![1; 2048]);
        assert!(validate_image(&no_extension).is_err());

        let empty = FileUpload::new("cat.png".to_string(), Vec::new());
        assert!(validate_image(&empty).is_err());

        let huge = FileUpload::new("cat.png".to_string(), vec![0; MAX_IMAGE_BYTES + 1]);
        assert!(validate_image(&huge).is_err());
    }
}
