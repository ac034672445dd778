use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Server-side half of a login. Only the SHA-256 of each token is stored.
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user_id: Uuid, token: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at, last_used_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(hash_token(token))
        .bind(expires_at.naive_utc())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Owner of a live session, touching `last_used_at` in the same
    /// statement. Expired and unknown tokens resolve to `None`.
    pub async fn resolve(&self, token: &str) -> Result<Option<Uuid>> {
        let now = Utc::now().naive_utc();

        let user_id: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE sessions SET last_used_at = ?
            WHERE token_hash = ? AND expires_at > ?
            RETURNING user_id
            "#
        )
        .bind(now)
        .bind(hash_token(token))
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        user_id
            .map(|id| Uuid::parse_str(&id).map_err(|e| AppError::Database(e.to_string())))
            .transpose()
    }

    pub async fn revoke(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(token.as_bytes()))
}
