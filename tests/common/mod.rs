#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

use async_trait::async_trait;
use axum::Router;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use staffboard::{
    api,
    auth::AuthService,
    config::Settings,
    domain::{Announcement, CreateUserRequest, User, UserRole},
    error::Result,
    repository::{AnnouncementRepository, SqliteUserRepository, UserRepository},
    service::ServiceContext,
};
use uuid::Uuid;

pub const PASSWORD: &str = "correct-horse-battery";

/// A private in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    // One connection: every new connection to :memory: is a fresh database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_context(pool: SqlitePool) -> Arc<ServiceContext> {
    let auth_service = Arc::new(AuthService::new(pool.clone(), 24, false));
    Arc::new(ServiceContext::from_pool(pool, auth_service))
}

pub fn test_app(ctx: Arc<ServiceContext>) -> Router {
    api::create_app(ctx, Arc::new(Settings::default()))
}

/// Argon2 hash of [`PASSWORD`], computed once per test binary.
pub async fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    if let Some(hash) = HASH.get() {
        return hash.clone();
    }
    let hash = AuthService::hash_password(PASSWORD)
        .await
        .expect("Failed to hash password");
    HASH.get_or_init(|| hash).clone()
}

/// Provisions a user whose password is [`PASSWORD`]. The email is derived
/// from the name.
pub async fn provision(pool: &SqlitePool, name: &str, role: UserRole) -> User {
    let repo = SqliteUserRepository::new(pool.clone());
    repo.create(CreateUserRequest {
        name: name.to_string(),
        email: email_for(name),
        department: "Engineering".to_string(),
        role,
        password_hash: password_hash().await,
        joined_at: None,
    })
    .await
    .expect("Failed to provision user")
}

pub fn email_for(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase().replace(' ', "."))
}

/// Counts lookups that overlap in time, per entity and overall. Each
/// lookup is held open briefly so unserialized callers do overlap.
#[derive(Default)]
pub struct InFlight {
    state: Mutex<InFlightState>,
}

#[derive(Default)]
struct InFlightState {
    active: HashMap<Uuid, usize>,
    total: usize,
    peak_per_entity: usize,
    peak_total: usize,
}

impl InFlight {
    const HOLD: Duration = Duration::from_millis(25);

    async fn observe(&self, id: Uuid) {
        {
            let mut state = self.state.lock().unwrap();
            let active = state.active.entry(id).or_default();
            *active += 1;
            let active = *active;
            state.total += 1;
            state.peak_per_entity = state.peak_per_entity.max(active);
            state.peak_total = state.peak_total.max(state.total);
        }

        tokio::time::sleep(Self::HOLD).await;

        let mut state = self.state.lock().unwrap();
        if let Some(active) = state.active.get_mut(&id) {
            *active -= 1;
        }
        state.total -= 1;
    }

    /// Most lookups ever open at once for a single entity.
    pub fn peak_per_entity(&self) -> usize {
        self.state.lock().unwrap().peak_per_entity
    }

    /// Most lookups ever open at once across all entities.
    pub fn peak_total(&self) -> usize {
        self.state.lock().unwrap().peak_total
    }
}

/// Delegates to `inner`, recording every `find_by_id` in an [`InFlight`].
pub struct Tracked<R> {
    inner: R,
    in_flight: Arc<InFlight>,
}

impl<R> Tracked<R> {
    pub fn new(inner: R, in_flight: Arc<InFlight>) -> Self {
        Self { inner, in_flight }
    }
}

#[async_trait]
impl<R: UserRepository> UserRepository for Tracked<R> {
    async fn create(&self, user: CreateUserRequest) -> Result<User> {
        self.inner.create(user).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.in_flight.observe(id).await;
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn list(&self) -> Result<Vec<User>> {
        self.inner.list().await
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<User> {
        self.inner.update_role(id, role).await
    }

    async fn password_hash(&self, email: &str) -> Result<Option<String>> {
        self.inner.password_hash(email).await
    }
}

#[async_trait]
impl<R: AnnouncementRepository> AnnouncementRepository for Tracked<R> {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        self.inner.create(announcement).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        self.in_flight.observe(id).await;
        self.inner.find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        self.inner.list().await
    }

    async fn set_pinned(&self, id: Uuid, pinned: bool) -> Result<Announcement> {
        self.inner.set_pinned(id, pinned).await
    }
}
