use std::env;
use std::time::Duration;

use crate::shared::constants::{
    DEFAULT_GEO_MAXIMUM_AGE_MS, DEFAULT_GEO_TIMEOUT_MS, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
    pub geolocation: GeolocationConfig,
}

/// Backend REST API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the spots API, without trailing slash
    pub base_url: String,
    pub request_timeout: Duration,
}

/// S3-compatible object storage configuration for spot images
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage endpoint URL used for uploads
    pub endpoint: String,
    /// Endpoint used when building public download URLs (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Resolve direct public URLs instead of presigned ones
    pub public_urls: bool,
    /// Presigned URL expiry time in seconds
    pub presigned_url_expiry_secs: u32,
}

/// Email/password identity provider configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_key: String,
    pub base_url: String,
    pub token_url: String,
    /// Refresh the ID token this long before it expires
    pub refresh_margin: Duration,
}

#[derive(Debug, Clone)]
pub struct GeolocationConfig {
    /// Accept a cached fix up to this age
    pub maximum_age: Duration,
    /// Give up on a fresh fix after this long
    pub timeout: Duration,
    pub default_longitude: f64,
    pub default_latitude: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            api: ApiConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            identity: IdentityConfig::from_env()?,
            geolocation: GeolocationConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = env::var("API_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "API_REQUEST_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl StorageConfig {
    const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u32 = 3600; // 1 hour

    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("STORAGE_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        let public_endpoint =
            env::var("STORAGE_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key =
            env::var("STORAGE_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let secret_key =
            env::var("STORAGE_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());

        let bucket = env::var("STORAGE_BUCKET").unwrap_or_else(|_| "spot-images".to_string());

        let region = env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let public_urls = env::var("STORAGE_PUBLIC_URLS")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "STORAGE_PUBLIC_URLS must be true or false".to_string())?;

        let presigned_url_expiry_secs = env::var("STORAGE_PRESIGNED_URL_EXPIRY_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_PRESIGNED_URL_EXPIRY_SECS.to_string())
            .parse::<u32>()
            .map_err(|_| "STORAGE_PRESIGNED_URL_EXPIRY_SECS must be a valid number".to_string())?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            public_endpoint: public_endpoint.trim_end_matches('/').to_string(),
            access_key,
            secret_key,
            bucket,
            region,
            public_urls,
            presigned_url_expiry_secs,
        })
    }
}

impl IdentityConfig {
    const DEFAULT_REFRESH_MARGIN_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("IDENTITY_API_KEY")
            .map_err(|_| "IDENTITY_API_KEY environment variable is required".to_string())?;

        let base_url = env::var("IDENTITY_BASE_URL")
            .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string());

        let token_url = env::var("IDENTITY_TOKEN_URL")
            .unwrap_or_else(|_| "https://securetoken.googleapis.com/v1/token".to_string());

        let refresh_margin_secs = env::var("IDENTITY_REFRESH_MARGIN_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REFRESH_MARGIN_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "IDENTITY_REFRESH_MARGIN_SECS must be a valid number".to_string())?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_url,
            refresh_margin: Duration::from_secs(refresh_margin_secs),
        })
    }
}

impl GeolocationConfig {
    pub fn from_env() -> Result<Self, String> {
        let maximum_age_ms = env::var("GEO_MAXIMUM_AGE_MS")
            .unwrap_or_else(|_| DEFAULT_GEO_MAXIMUM_AGE_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "GEO_MAXIMUM_AGE_MS must be a valid number".to_string())?;

        let timeout_ms = env::var("GEO_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_GEO_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "GEO_TIMEOUT_MS must be a valid number".to_string())?;

        let default_longitude = env::var("GEO_DEFAULT_LONGITUDE")
            .unwrap_or_else(|_| DEFAULT_LONGITUDE.to_string())
            .parse::<f64>()
            .map_err(|_| "GEO_DEFAULT_LONGITUDE must be a valid number".to_string())?;

        let default_latitude = env::var("GEO_DEFAULT_LATITUDE")
            .unwrap_or_else(|_| DEFAULT_LATITUDE.to_string())
            .parse::<f64>()
            .map_err(|_| "GEO_DEFAULT_LATITUDE must be a valid number".to_string())?;

        Ok(Self {
            maximum_age: Duration::from_millis(maximum_age_ms),
            timeout: Duration::from_millis(timeout_ms),
            default_longitude,
            default_latitude,
        })
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            maximum_age: Duration::from_millis(DEFAULT_GEO_MAXIMUM_AGE_MS),
            timeout: Duration::from_millis(DEFAULT_GEO_TIMEOUT_MS),
            default_longitude: DEFAULT_LONGITUDE,
            default_latitude: DEFAULT_LATITUDE,
        }
    }
}
