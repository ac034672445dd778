use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::{CreateUserRequest, User, UserRole},
    error::{AppError, Result},
    repository::UserRepository,
};

// Database row struct that matches SQLite schema
#[derive(FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    department: String,
    role: String,
    joined_at: NaiveDateTime,
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow) -> Result<User> {
        Ok(User {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            email: row.email,
            department: row.department,
            role: UserRole::parse(&row.role)
                .map_err(|_| AppError::Database(format!("Invalid role: {}", row.role)))?,
            joined_at: DateTime::from_naive_utc_and_offset(row.joined_at, Utc),
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, request: CreateUserRequest) -> Result<User> {
        if self.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A user with email {} already exists",
                request.email
            )));
        }

        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        let joined_at = request.joined_at.map(|dt| dt.naive_utc()).unwrap_or(now);

        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, department, role, password_hash,
                joined_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.department)
        .bind(request.role.as_str())
        .bind(&request.password_hash)
        .bind(joined_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created user".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, department, role, joined_at
            FROM users
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, department, role, joined_at
            FROM users
            WHERE email = ?
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, department, role, joined_at
            FROM users
            ORDER BY name ASC, id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_user)
            .collect()
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<User> {
        let result = sqlx::query(
            "UPDATE users SET role = ?, updated_at = ? WHERE id = ?"
        )
        .bind(role.as_str())
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated user".to_string())
        })
    }

    async fn password_hash(&self, email: &str) -> Result<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM users WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }
}
