use async_trait::async_trait;
use chrono::{DateTime, Utc, NaiveDateTime};
use sqlx::{SqlitePool, FromRow};
use uuid::Uuid;

use crate::{
    domain::Announcement,
    error::{AppError, Result},
    repository::AnnouncementRepository,
};

#[derive(FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    content: String,
    author_id: String,
    author_name: String,
    pinned: i32,
    created_at: NaiveDateTime,
}

pub struct SqliteAnnouncementRepository {
    pool: SqlitePool,
}

impl SqliteAnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_announcement(row: AnnouncementRow) -> Result<Announcement> {
        Ok(Announcement {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            content: row.content,
            author_id: Uuid::parse_str(&row.author_id).map_err(|e| AppError::Database(e.to_string()))?,
            author_name: row.author_name,
            pinned: row.pinned != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> Result<Announcement> {
        let pinned_int = if announcement.pinned { 1i32 } else { 0i32 };

        sqlx::query(
            r#"
            INSERT INTO announcements (
                id, title, content, author_id, author_name, pinned, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(announcement.id.to_string())
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.author_id.to_string())
        .bind(&announcement.author_name)
        .bind(pinned_int)
        .bind(announcement.created_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(announcement.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created announcement".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, content, author_id, author_name, pinned, created_at
            FROM announcements
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(Self::row_to_announcement(r)?)),
            None => Ok(None)
        }
    }

    async fn list(&self) -> Result<Vec<Announcement>> {
        // rowid breaks ties between announcements created in the same instant
        let rows = sqlx::query_as::<_, AnnouncementRow>(
            r#"
            SELECT id, title, content, author_id, author_name, pinned, created_at
            FROM announcements
            ORDER BY pinned DESC, created_at DESC, rowid DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_announcement)
            .collect()
    }

    async fn set_pinned(&self, id: Uuid, pinned: bool) -> Result<Announcement> {
        let pinned_int = if pinned { 1i32 } else { 0i32 };

        let result = sqlx::query("UPDATE announcements SET pinned = ? WHERE id = ?")
            .bind(pinned_int)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Announcement not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated announcement".to_string())
        })
    }
}
