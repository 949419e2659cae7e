use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::ApiError;

const COLUMNS: &str = "id, email, name, picture, password_hash, created_at";

/// Postgres unique-violation, the error the `users_email_key` index raises
/// when a concurrent registration wins the insert race.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    /// Create a new user. `password_hash` is `None` for accounts coming from
    /// the external identity exchange. The handlers pre-check the email, but
    /// the unique index is the real arbiter: a losing concurrent insert comes
    /// back as `DuplicateEmail`, not an internal error.
    pub async fn create(
        db: &PgPool,
        email: &str,
        name: &str,
        picture: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, picture, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(picture)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::DuplicateEmail
            } else {
                ApiError::Internal(e.into())
            }
        })?;
        Ok(user)
    }

    /// Refresh name and picture from the external identity provider. The user
    /// id is already resolved, so no ownership check applies here.
    pub async fn sync_identity(
        db: &PgPool,
        id: Uuid,
        name: &str,
        picture: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $2, picture = $3 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(picture)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_conflict_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolClosed));
    }
}
