use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: UserRole,
    pub joined_at: DateTime<Utc>,
}

/// Capability tiers. Ordered `Employee < Admin < Superadmin` by what they
/// may do, not by any numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Employee,
    Admin,
    Superadmin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Employee, UserRole::Admin, UserRole::Superadmin];

    /// Lowercase string for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::Admin => "admin",
            UserRole::Superadmin => "superadmin",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "employee" => Ok(UserRole::Employee),
            "admin" => Ok(UserRole::Admin),
            "superadmin" => Ok(UserRole::Superadmin),
            _ => Err(AppError::InvalidInput(format!("Invalid role: {}", s))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account provisioning input. Accounts are created by operators and the
/// seed binary, never through the public API.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: UserRole,
    pub password_hash: String,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRoleRequest {
    pub role: UserRole,
}
