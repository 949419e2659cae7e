use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Bookkeeping row for an uploaded object; the bytes live in object storage.
#[derive(Debug, Clone, FromRow)]
pub struct Upload {
    pub id: Uuid,
    pub s3_key: String,
    pub content_type: String,
    pub created_at: OffsetDateTime,
}

impl Upload {
    pub async fn insert(db: &PgPool, s3_key: &str, content_type: &str) -> anyhow::Result<Upload> {
        let upload = sqlx::query_as::<_, Upload>(
            "INSERT INTO uploads (s3_key, content_type)
             VALUES ($1, $2)
             RETURNING id, s3_key, content_type, created_at",
        )
        .bind(s3_key)
        .bind(content_type)
        .fetch_one(db)
        .await
        .context("insert upload")?;
        Ok(upload)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Upload>> {
        let upload = sqlx::query_as::<_, Upload>(
            "SELECT id, s3_key, content_type, created_at FROM uploads WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("get upload")?;
        Ok(upload)
    }
}
