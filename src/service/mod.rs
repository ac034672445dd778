pub mod announcement_service;
pub mod entity_locks;
pub mod user_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::auth::AuthService;
use announcement_service::AnnouncementService;
use user_service::UserService;

pub use user_service::RoleCounts;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        announcement_repo: Arc<dyn AnnouncementRepository>,
        auth_service: Arc<AuthService>,
        db_pool: SqlitePool,
    ) -> Self {
        let user_service = Arc::new(UserService::new(user_repo.clone()));
        let announcement_service = Arc::new(AnnouncementService::new(announcement_repo.clone()));

        Self {
            user_repo,
            announcement_repo,
            auth_service,
            user_service,
            announcement_service,
            db_pool,
        }
    }

    /// Wires SQLite repositories over `pool`.
    pub fn from_pool(pool: SqlitePool, auth_service: Arc<AuthService>) -> Self {
        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let announcement_repo = Arc::new(SqliteAnnouncementRepository::new(pool.clone()));

        Self::new(user_repo, announcement_repo, auth_service, pool)
    }
}
