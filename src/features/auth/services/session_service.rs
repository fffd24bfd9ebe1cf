use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tokio::time::Instant;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::IdentityProvider;
use crate::features::auth::dtos::CredentialsDto;
use crate::features::auth::model::{AuthSession, SessionState, SessionTokens, SessionUser};
use crate::modules::api::AccessTokenProvider;

/// Tokens with the time they were issued
struct TokenCache {
    tokens: SessionTokens,
    fetched_at: Instant,
}

/// Holds the current session and publishes every change
pub struct SessionService {
    provider: Arc<dyn IdentityProvider>,
    state: watch::Sender<SessionState>,
    cache: RwLock<Option<TokenCache>>,
    /// Bumped whenever the cached tokens are replaced or dropped, under the
    /// cache write lock
    generation: AtomicU64,
    /// Refresh the ID token this long before expiration
    refresh_margin: Duration,
}

impl SessionService {
    pub fn new(provider: Arc<dyn IdentityProvider>, refresh_margin: Duration) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            provider,
            state,
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
            refresh_margin,
        }
    }

    /// Resolve the initial session, optionally from a stored refresh token
    pub async fn restore(&self, refresh_token: Option<&str>) -> Result<SessionState> {
        let Some(refresh_token) = refresh_token else {
            return Ok(self.publish(None));
        };

        match self.provider.refresh(refresh_token).await {
            Ok(session) => Ok(self.establish(session).await),
            Err(e) => {
                tracing::warn!("Could not restore session: {}", e);
                self.publish(None);
                Err(into_auth_error(e))
            }
        }
    }

    pub async fn sign_in(&self, credentials: CredentialsDto) -> Result<SessionState> {
        credentials
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let previous = self.begin();
        match self
            .provider
            .sign_in(&credentials.email, &credentials.password)
            .await
        {
            Ok(session) => Ok(self.establish(session).await),
            Err(e) => Err(self.abort(previous, e)),
        }
    }

    pub async fn sign_up(&self, credentials: CredentialsDto) -> Result<SessionState> {
        credentials
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let previous = self.begin();
        match self
            .provider
            .sign_up(&credentials.email, &credentials.password)
            .await
        {
            Ok(session) => Ok(self.establish(session).await),
            Err(e) => Err(self.abort(previous, e)),
        }
    }

    pub async fn sign_out(&self) -> Result<SessionState> {
        let Some(user) = self.current_user() else {
            return Ok(self.publish(None));
        };

        let previous = self.begin();
        if let Err(e) = self.provider.sign_out(&user).await {
            return Err(self.abort(previous, e));
        }

        self.clear_tokens().await;
        tracing::info!("User {} signed out", user.id);
        Ok(self.publish(None))
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receiver notified on every session change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current ID token, refreshed when close to expiry.
    ///
    /// Returns `None` when signed out or when the refresh fails. A refresh
    /// that completes after the session changed is discarded.
    pub async fn id_token(&self) -> Option<String> {
        let (refresh_token, generation) = {
            let cache = self.cache.read().await;
            let cached = cache.as_ref()?;
            let elapsed = cached.fetched_at.elapsed();

            if elapsed + self.refresh_margin < cached.tokens.expires_in {
                return Some(cached.tokens.id_token.clone());
            }
            (
                cached.tokens.refresh_token.clone(),
                self.generation.load(Ordering::SeqCst),
            )
        };

        let session = match self.provider.refresh(&refresh_token).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("ID token refresh failed: {}", e);
                return None;
            }
        };

        let mut cache = self.cache.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Session changed during token refresh, discarding refreshed tokens");
            return cache.as_ref().map(|cached| cached.tokens.id_token.clone());
        }

        tracing::debug!("Refreshed ID token for user {}", session.user.id);
        let id_token = session.tokens.id_token.clone();
        self.replace_tokens(&mut cache, Some(session.tokens));
        Some(id_token)
    }

    /// Mark an operation in flight, returning the state to roll back to
    fn begin(&self) -> SessionState {
        let previous = self.state();
        self.state.send_modify(|state| state.loading = true);
        previous
    }

    fn abort(&self, previous: SessionState, error: AppError) -> AppError {
        tracing::warn!("Session operation failed: {}", error);
        self.state.send_replace(previous);
        into_auth_error(error)
    }

    async fn establish(&self, session: AuthSession) -> SessionState {
        self.store_tokens(session.tokens).await;
        tracing::info!("User {} signed in", session.user.id);
        self.publish(Some(session.user))
    }

    async fn store_tokens(&self, tokens: SessionTokens) {
        let mut cache = self.cache.write().await;
        self.replace_tokens(&mut cache, Some(tokens));
    }

    async fn clear_tokens(&self) {
        let mut cache = self.cache.write().await;
        self.replace_tokens(&mut cache, None);
    }

    /// Caller holds the cache write lock
    fn replace_tokens(&self, cache: &mut Option<TokenCache>, tokens: Option<SessionTokens>) {
        *cache = tokens.map(|tokens| TokenCache {
            tokens,
            fetched_at: Instant::now(),
        });
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn publish(&self, user: Option<SessionUser>) -> SessionState {
        let state = SessionState {
            user,
            loading: false,
        };
        self.state.send_replace(state.clone());
        state
    }
}

#[async_trait]
impl AccessTokenProvider for SessionService {
    async fn access_token(&self) -> Option<String> {
        self.id_token().await
    }
}

fn into_auth_error(error: AppError) -> AppError {
    match error {
        AppError::Auth(_) => error,
        other => AppError::Auth(other.to_string()),
    }
}
