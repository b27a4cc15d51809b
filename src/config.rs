use std::env;
use std::str::FromStr;

use crate::uploader::service::CloudinaryConfig;
use crate::utils::helpers::DEFAULT_SERVICE_NAME;

/// Where posts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be 'mongo' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_name: String,
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub jwt_secret: String,
    /// Reject bearer tokens whose `verified` claim is false.
    pub require_verified_actor: bool,
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub cloudinary: Option<CloudinaryConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET is required")?;
        if jwt_secret.trim().is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let config = Self {
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8000)?,
            storage_backend: parse_var("STORAGE_BACKEND", StorageBackend::Mongo)?,
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "confessions".to_string()),
            jwt_secret,
            require_verified_actor: parse_var("REQUIRE_VERIFIED_ACTOR", true)?,
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", 10)?,
            max_page_size: parse_var("MAX_PAGE_SIZE", 50)?,
            cloudinary: CloudinaryConfig::from_env().ok(),
        };

        if config.default_page_size == 0 || config.max_page_size == 0 {
            return Err("page sizes must be greater than zero".to_string());
        }

        Ok(config)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            storage_backend: StorageBackend::Memory,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "confessions_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            require_verified_actor: true,
            default_page_size: 10,
            max_page_size: 50,
            cloudinary: None,
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| format!("{} has an invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_known_values() {
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!("MongoDB".parse::<StorageBackend>(), Ok(StorageBackend::Mongo));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
