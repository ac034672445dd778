use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::policy,
    domain::{Announcement, CreateAnnouncementRequest, User},
    error::{AppError, Result},
    repository::AnnouncementRepository,
    service::entity_locks::EntityLocks,
};

pub struct AnnouncementService {
    repo: Arc<dyn AnnouncementRepository>,
    locks: EntityLocks,
}

impl AnnouncementService {
    pub fn new(repo: Arc<dyn AnnouncementRepository>) -> Self {
        Self {
            repo,
            locks: EntityLocks::new(),
        }
    }

    /// Pinned announcements first, newest first within each group.
    pub async fn list(&self) -> Result<Vec<Announcement>> {
        self.repo.list().await
    }

    pub async fn create(&self, caller: &User, request: CreateAnnouncementRequest) -> Result<Announcement> {
        if !policy::can_create_announcement(caller.role) {
            return Err(AppError::Unauthorized(
                "Only admins can create announcements".to_string(),
            ));
        }

        if request.author_id.is_some_and(|id| id != caller.id)
            || request.author_name.as_ref().is_some_and(|name| name != &caller.name)
        {
            return Err(AppError::Unauthorized(
                "Announcements can only be posted as yourself".to_string(),
            ));
        }

        let title = request.title.trim();
        let content = request.content.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title is required".to_string()));
        }
        if content.is_empty() {
            return Err(AppError::InvalidInput("Content is required".to_string()));
        }
        request.validate()?;

        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author_id: caller.id,
            author_name: caller.name.clone(),
            pinned: false,
            created_at: Utc::now(),
        };

        let created = self.repo.create(announcement).await?;

        tracing::info!(
            announcement_id = %created.id,
            author_id = %caller.id,
            "Announcement created"
        );

        Ok(created)
    }

    /// Setting the value an announcement already has is a no-op.
    pub async fn set_pinned(&self, caller: &User, id: Uuid, pinned: bool) -> Result<Announcement> {
        if !policy::can_pin_announcement(caller.role) {
            return Err(AppError::Unauthorized(
                "Only admins can pin announcements".to_string(),
            ));
        }

        let _guard = self.locks.acquire(id).await;

        let existing = self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

        if existing.pinned == pinned {
            return Ok(existing);
        }

        let updated = self.repo.set_pinned(id, pinned).await?;

        tracing::info!(
            announcement_id = %id,
            pinned,
            actor_id = %caller.id,
            "Announcement pin state changed"
        );

        Ok(updated)
    }
}
