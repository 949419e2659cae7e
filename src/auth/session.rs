use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Server-side session backing an opaque bearer/cookie token.
///
/// A user may hold any number of concurrent sessions. Expired rows are not
/// purged; they are simply rejected on lookup.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, token, expires_at, created_at";

/// 32 bytes from the OS CSPRNG, URL-safe base64 without padding. Never derived
/// from user data.
pub fn generate_token() -> String {
    let mut buf = [0u8; 32];
    OsRng.fill_bytes(&mut buf);
    Base64UrlUnpadded::encode_string(&buf)
}

impl Session {
    /// Expiry check applied on every lookup. The row itself is never deleted
    /// by expiry, so an expired session must fail here.
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now
    }

    pub async fn create(db: &PgPool, user_id: Uuid, ttl: Duration) -> anyhow::Result<Session> {
        Self::create_with_token(db, user_id, &generate_token(), ttl).await
    }

    /// Store a caller-supplied token, used by the external identity exchange
    /// which reuses the provider-issued token as the local one. Exchanging the
    /// same provider session twice refreshes the expiry instead of failing on
    /// the unique index.
    pub async fn create_with_token(
        db: &PgPool,
        user_id: Uuid,
        token: &str,
        ttl: Duration,
    ) -> anyhow::Result<Session> {
        let expires_at = OffsetDateTime::now_utc() + ttl;
        let session = sqlx::query_as::<_, Session>(&format!(
            "INSERT INTO sessions (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (token) DO UPDATE SET expires_at = EXCLUDED.expires_at
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(session)
    }

    /// Look up a token. Returns `None` for unknown tokens and for sessions
    /// whose expiry has passed (lazy expiry, the row stays in place).
    pub async fn resolve(db: &PgPool, token: &str) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {COLUMNS} FROM sessions WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(session.filter(|s| s.is_active(OffsetDateTime::now_utc())))
    }

    /// Idempotent delete; revoking an unknown token is a no-op.
    pub async fn revoke(db: &PgPool, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }
}
