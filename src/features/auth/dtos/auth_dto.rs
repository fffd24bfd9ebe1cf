use serde::{Deserialize, Serialize};
use validator::Validate;

/// Email/password pair for sign-in and sign-up
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CredentialsDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl CredentialsDto {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

/// Request body for `accounts:signInWithPassword` and `accounts:signUp`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordAuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Response of `accounts:signInWithPassword` and `accounts:signUp`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordAuthResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds, sent as a string
    pub expires_in: String,
}

/// Response of the secure token refresh endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshTokenResponse {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    pub user_id: String,
}

/// Identity provider error envelope
#[derive(Debug, Deserialize)]
pub(crate) struct IdentityErrorResponse {
    pub error: IdentityErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdentityErrorBody {
    #[serde(default)]
    pub message: String,
}
