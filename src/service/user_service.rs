use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::policy,
    domain::{User, UserRole},
    error::{AppError, Result},
    repository::UserRepository,
    service::entity_locks::EntityLocks,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleCounts {
    pub employee: usize,
    pub admin: usize,
    pub superadmin: usize,
    pub total: usize,
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    locks: EntityLocks,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            repo,
            locks: EntityLocks::new(),
        }
    }

    /// Full directory, names and emails included. Restricted to roles that
    /// manage users; everyone else sees only the dashboard role counts.
    pub async fn list(&self, caller: &User) -> Result<Vec<User>> {
        if !policy::can_manage_users(caller.role) {
            return Err(AppError::Unauthorized(
                "Only superadmins can view the user directory".to_string(),
            ));
        }

        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        self.repo.find_by_id(id).await
    }

    pub async fn role_counts(&self) -> Result<RoleCounts> {
        let users = self.repo.list().await?;
        let mut counts = RoleCounts {
            total: users.len(),
            ..Default::default()
        };

        for user in &users {
            match user.role {
                UserRole::Employee => counts.employee += 1,
                UserRole::Admin => counts.admin += 1,
                UserRole::Superadmin => counts.superadmin += 1,
            }
        }

        Ok(counts)
    }

    /// Changes another user's role. The self check runs before anything
    /// else so it holds for every caller role.
    pub async fn update_role(&self, caller: &User, user_id: Uuid, role: UserRole) -> Result<User> {
        if user_id == caller.id {
            return Err(AppError::SelfModification);
        }

        if !policy::can_manage_users(caller.role) {
            return Err(AppError::Unauthorized(
                "Only superadmins can change roles".to_string(),
            ));
        }

        let _guard = self.locks.acquire(user_id).await;

        let target = self.repo.find_by_id(user_id).await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !policy::can_change_role(caller, &target, role) {
            return Err(AppError::Unauthorized(
                "Not allowed to change this user's role".to_string(),
            ));
        }

        if target.role == role {
            return Ok(target);
        }

        let updated = self.repo.update_role(user_id, role).await?;

        tracing::info!(
            user_id = %user_id,
            old_role = %target.role,
            new_role = %role,
            actor_id = %caller.id,
            "User role changed"
        );

        Ok(updated)
    }
}
