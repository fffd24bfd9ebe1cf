use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::Serialize;

use crate::core::config::IdentityConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    IdentityErrorResponse, PasswordAuthRequest, PasswordAuthResponse, RefreshTokenResponse,
};
use crate::features::auth::model::{AuthSession, SessionTokens, SessionUser};

/// Email/password identity backend
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Exchange a refresh token for fresh tokens
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession>;

    async fn sign_out(&self, user: &SessionUser) -> Result<()>;
}

/// Client for an Identity Toolkit style REST API
pub struct IdentityToolkitClient {
    config: IdentityConfig,
    http_client: reqwest::Client,
}

impl IdentityToolkitClient {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn accounts_url(&self, action: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.base_url,
            action,
            urlencoding::encode(&self.config.api_key)
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}?key={}",
            self.config.token_url,
            urlencoding::encode(&self.config.api_key)
        )
    }

    async fn password_auth(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession> {
        let request_body = PasswordAuthRequest {
            email,
            password,
            return_secure_token: true,
        };

        tracing::debug!("Identity request {} for {}", action, email);

        let response = self.post_json(&self.accounts_url(action), &request_body).await?;
        let body = Self::read_success::<PasswordAuthResponse>(response).await?;

        tracing::info!("Identity {} succeeded for user {}", action, body.local_id);

        Ok(AuthSession {
            user: SessionUser {
                id: body.local_id,
                email: body.email.or_else(|| Some(email.to_string())),
            },
            tokens: SessionTokens {
                id_token: body.id_token,
                refresh_token: body.refresh_token,
                expires_in: parse_expires_in(&body.expires_in),
            },
        })
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Response> {
        self.http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity request failed: {}", e);
                AppError::Auth("Could not reach the sign-in service".to_string())
            })
    }

    async fn read_success<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                tracing::error!("Failed to parse identity response: {}", e);
                AppError::Auth(format!("Failed to parse identity response: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Identity API error: HTTP {} - {}", status, body);

        match serde_json::from_str::<IdentityErrorResponse>(&body) {
            Ok(error_response) => Err(AppError::Auth(auth_error_message(
                &error_response.error.message,
            ))),
            Err(_) => Err(AppError::Auth(format!("Identity API error: HTTP {}", status))),
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.password_auth("signInWithPassword", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.password_auth("signUp", email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        tracing::debug!("Refreshing identity token");

        let response = self
            .http_client
            .post(self.token_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token refresh request failed: {}", e);
                AppError::Auth("Could not reach the sign-in service".to_string())
            })?;

        let body = Self::read_success::<RefreshTokenResponse>(response).await?;

        Ok(AuthSession {
            user: SessionUser {
                id: body.user_id,
                email: None,
            },
            tokens: SessionTokens {
                id_token: body.id_token,
                refresh_token: body.refresh_token,
                expires_in: parse_expires_in(&body.expires_in),
            },
        })
    }

    async fn sign_out(&self, user: &SessionUser) -> Result<()> {
        // Tokens are bearer-only; signing out means forgetting them
        tracing::debug!("Signing out user {}", user.id);
        Ok(())
    }
}

/// Map provider error codes to messages for the user.
///
/// Codes may carry a suffix such as `WEAK_PASSWORD : Password should be ...`.
pub fn auth_error_message(code: &str) -> String {
    let key = code.split(" : ").next().unwrap_or(code).trim();

    match key {
        "EMAIL_EXISTS" => "Email already registered".to_string(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid credentials".to_string()
        }
        "USER_DISABLED" => "Account is disabled".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts, try again later".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" => "Session expired, please sign in again".to_string(),
        "" => "Authentication failed".to_string(),
        _ => code.to_string(),
    }
}

/// Token lifetime in seconds, sent as a string. Defaults to one hour.
fn parse_expires_in(raw: &str) -> Duration {
    Duration::from_secs(raw.trim().parse::<u64>().unwrap_or(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IdentityToolkitClient {
        IdentityToolkitClient::new(IdentityConfig {
            api_key: "key with space".to_string(),
            base_url: "https://identity.test/v1".to_string(),
            token_url: "https://token.test/v1/token".to_string(),
            refresh_margin: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(
            client.accounts_url("signUp"),
            "https://identity.test/v1/accounts:signUp?key=key%20with%20space"
        );
        assert_eq!(client.token_url(), "https://token.test/v1/token?key=key%20with%20space");
    }

    #[test]
    fn test_auth_error_message() {
        assert_eq!(auth_error_message("EMAIL_EXISTS"), "Email already registered");
        assert_eq!(auth_error_message("INVALID_PASSWORD"), "Invalid credentials");
        assert_eq!(
            auth_error_message("INVALID_LOGIN_CREDENTIALS"),
            "Invalid credentials"
        );
        assert_eq!(auth_error_message("USER_DISABLED"), "Account is disabled");
        assert_eq!(
            auth_error_message("WEAK_PASSWORD : Password should be at least 6 characters"),
            "WEAK_PASSWORD : Password should be at least 6 characters"
        );
    }

    #[test]
    fn test_parse_expires_in() {
        assert_eq!(parse_expires_in("3600"), Duration::from_secs(3600));
        assert_eq!(parse_expires_in("garbage"), Duration::from_secs(3600));
    }
}
