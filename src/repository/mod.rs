use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod announcement_repository;

pub use user_repository::SqliteUserRepository;
pub use announcement_repository::SqliteAnnouncementRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Directory listing, ordered by name then id.
    async fn list(&self) -> Result<Vec<User>>;
    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<User>;
    async fn password_hash(&self, email: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> Result<Announcement>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>>;
    /// Feed order: pinned first, then newest first.
    async fn list(&self) -> Result<Vec<Announcement>>;
    async fn set_pinned(&self, id: Uuid, pinned: bool) -> Result<Announcement>;
}
