use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Business-card profile. `user_id` is the immutable owner; `unique_link` is
/// the public slug of the card page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub job: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub whatsapp: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    pub photo_url: Option<String>,
    pub cover_url: Option<String>,
    pub design_type: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub unique_link: String,
    pub is_archived: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub subscription_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
impl Profile {
    /// Minimal profile for unit tests; required fields filled, the rest empty.
    pub fn stub(name: &str, job: &str, phone: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            job: job.to_string(),
            phone: phone.to_string(),
            email: None,
            company: None,
            whatsapp: None,
            website: None,
            address: None,
            instagram: None,
            facebook: None,
            linkedin: None,
            tiktok: None,
            youtube: None,
            photo_url: None,
            cover_url: None,
            design_type: None,
            primary_color: "#3B82F6".to_string(),
            secondary_color: "#8B5CF6".to_string(),
            unique_link: "stub-00000000".to_string(),
            is_archived: false,
            subscription_start: now,
            created_at: now,
            updated_at: now,
        }
    }
}
