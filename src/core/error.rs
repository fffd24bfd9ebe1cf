use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Persist error: {0}")]
    Persist(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Geolocation error: {0}")]
    Geolocation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Message suitable for showing to the user who triggered the operation.
    ///
    /// Collaborator failures are logged with their full detail and replaced
    /// by a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Upload(msg) => {
                tracing::error!("Upload error: {}", msg);
                "An image could not be uploaded. Please try again.".to_string()
            }
            AppError::Persist(msg) => {
                tracing::error!("Persist error: {}", msg);
                "The request could not be completed. Please try again.".to_string()
            }
            AppError::Auth(msg) => msg.clone(),
            AppError::Geolocation(msg) => {
                tracing::warn!("Geolocation error: {}", msg);
                "Your location could not be determined.".to_string()
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                "The application is not configured correctly.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
