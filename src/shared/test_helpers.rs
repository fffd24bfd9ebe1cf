//! In-memory collaborators for unit tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::IdentityProvider;
use crate::features::auth::model::{AuthSession, SessionTokens, SessionUser};
use crate::features::spots::dtos::CreateSpotRequest;
use crate::features::spots::models::{
    Coordinates, Spot, SpotSeverity, SpotStatus, SpotType,
};
use crate::modules::api::SpotApi;
use crate::modules::storage::ObjectStorage;

pub fn sample_spot(id: &str, voting: i64) -> Spot {
    Spot {
        id: id.to_string(),
        location: Coordinates::new(9.18, 48.78),
        spot_type: SpotType::Danger,
        severity: SpotSeverity::High,
        comment: None,
        images: Vec::new(),
        voting,
        status: SpotStatus::Pending,
        validated: false,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single(),
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single(),
    }
}

// =============================================================================
// SPOTS API
// =============================================================================

#[derive(Default)]
pub struct FakeSpotApi {
    spots: Mutex<Vec<Spot>>,
    list_responses: Mutex<VecDeque<(Duration, Vec<Spot>)>>,
    creates: Mutex<Vec<CreateSpotRequest>>,
    votings: Mutex<HashMap<String, i64>>,
    echo: Mutex<Option<i64>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FakeSpotApi {
    pub fn with_spots(spots: Vec<Spot>) -> Self {
        Self {
            spots: Mutex::new(spots),
            ..Default::default()
        }
    }

    /// Answer the next list calls, in call order, with these collections
    /// after the given delays
    pub fn queue_list_responses(&self, responses: Vec<(Duration, Vec<Spot>)>) {
        self.list_responses.lock().unwrap().extend(responses);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Voting value the fake echoes back from PATCH
    pub fn echo_voting(&self, voting: Option<i64>) {
        *self.echo.lock().unwrap() = voting;
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn last_create(&self) -> Option<CreateSpotRequest> {
        self.creates.lock().unwrap().last().cloned()
    }

    pub fn last_voting(&self, id: &str) -> Option<i64> {
        self.votings.lock().unwrap().get(id).copied()
    }
}

#[async_trait]
impl SpotApi for FakeSpotApi {
    async fn list_spots(&self) -> Result<Vec<Spot>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Persist("Spots API error: HTTP 503".to_string()));
        }

        let queued = self.list_responses.lock().unwrap().pop_front();
        match queued {
            Some((delay, spots)) => {
                tokio::time::sleep(delay).await;
                Ok(spots)
            }
            None => Ok(self.spots.lock().unwrap().clone()),
        }
    }

    async fn create_spot(&self, request: &CreateSpotRequest) -> Result<Spot> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persist("Spots API error: HTTP 500".to_string()));
        }

        let mut creates = self.creates.lock().unwrap();
        creates.push(request.clone());

        let props = &request.properties;
        let spot = Spot {
            id: format!("spot-{}", creates.len()),
            location: request.geometry.coordinates,
            spot_type: props.spot_type,
            severity: props.severity,
            comment: props.comment.clone(),
            images: props.images.clone(),
            voting: props.voting,
            status: props.status,
            validated: props.validated,
            created_at: props.created_at,
            updated_at: props.updated_at,
        };
        self.spots.lock().unwrap().push(spot.clone());
        Ok(spot)
    }

    async fn get_spot(&self, id: &str) -> Result<Spot> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Persist("Spots API error: HTTP 503".to_string()));
        }
        self.spots
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| AppError::Persist(format!("Spot '{}' not found", id)))
    }

    async fn update_voting(&self, id: &str, voting: i64) -> Result<Option<i64>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persist("Spots API error: HTTP 500".to_string()));
        }
        self.votings.lock().unwrap().insert(id.to_string(), voting);
        Ok(*self.echo.lock().unwrap())
    }
}

// =============================================================================
// OBJECT STORAGE
// =============================================================================

/// Delays and failures are configured per filename and matched against the
/// end of the object key.
#[derive(Default)]
pub struct FakeStorage {
    objects: Mutex<Vec<(String, Vec<u8>)>>,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    uploads: AtomicUsize,
}

impl FakeStorage {
    pub fn with_delay(mut self, filename: &str, delay: Duration) -> Self {
        self.delays.insert(filename.to_string(), delay);
        self
    }

    pub fn failing_on(mut self, filename: &str) -> Self {
        self.failing.insert(filename.to_string());
        self
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn stored(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, data)| data.clone())
    }

    /// Keys of all stored objects, in completion order
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn matches<'a>(names: impl IntoIterator<Item = &'a String>, key: &str) -> Option<&'a String> {
        names.into_iter().find(|name| key.ends_with(name.as_str()))
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);

        if let Some(name) = Self::matches(self.delays.keys(), key) {
            tokio::time::sleep(self.delays[name]).await;
        }
        if Self::matches(&self.failing, key).is_some() {
            return Err(AppError::Upload(format!("Failed to upload file '{}'", key)));
        }

        let mut objects = self.objects.lock().unwrap();
        objects.retain(|(stored, _)| stored != key);
        objects.push((key.to_string(), data));
        Ok(key.to_string())
    }

    async fn download_url(&self, key: &str) -> Result<String> {
        Ok(format!("https://storage.test/{}", key))
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

pub struct FakeIdentity {
    accounts: Mutex<HashMap<String, (String, String)>>,
    lifetime: Duration,
    refresh_delay: Duration,
    issued: AtomicUsize,
    calls: AtomicUsize,
    refreshes: AtomicUsize,
}

impl Default for FakeIdentity {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            lifetime: Duration::from_secs(3600),
            refresh_delay: Duration::ZERO,
            issued: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
        }
    }
}

impl FakeIdentity {
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.refresh_delay = delay;
        self
    }

    /// Create an account, returning its user id
    pub fn register(&self, email: &str, password: &str) -> String {
        let mut accounts = self.accounts.lock().unwrap();
        let id = format!("user-{}", accounts.len() + 1);
        accounts.insert(email.to_string(), (id.clone(), password.to_string()));
        id
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn session(&self, id: &str, email: Option<&str>) -> AuthSession {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        AuthSession {
            user: SessionUser {
                id: id.to_string(),
                email: email.map(String::from),
            },
            tokens: SessionTokens {
                id_token: format!("id-token-{}", n),
                refresh_token: format!("refresh-{}", id),
                expires_in: self.lifetime,
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let account = self.accounts.lock().unwrap().get(email).cloned();

        match account {
            Some((id, stored)) if stored == password => Ok(self.session(&id, Some(email))),
            _ => Err(AppError::Auth("Invalid credentials".to_string())),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(AppError::Auth("Email already registered".to_string()));
        }

        let id = self.register(email, password);
        Ok(self.session(&id, Some(email)))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        if !self.refresh_delay.is_zero() {
            tokio::time::sleep(self.refresh_delay).await;
        }

        match refresh_token.strip_prefix("refresh-") {
            Some(id) => Ok(self.session(id, None)),
            None => Err(AppError::Auth(
                "Session expired, please sign in again".to_string(),
            )),
        }
    }

    async fn sign_out(&self, _user: &SessionUser) -> Result<()> {
        Ok(())
    }
}
