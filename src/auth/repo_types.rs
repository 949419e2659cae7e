use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // NULL for external-identity accounts
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
