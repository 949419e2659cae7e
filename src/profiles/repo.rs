use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::profiles::dto::{ProfileCreate, ProfileFilter, ProfileUpdate};
use crate::profiles::repo_types::Profile;
use crate::profiles::slug::generate_unique_link;

const COLUMNS: &str = "id, user_id, name, job, phone, email, company, whatsapp, website, address, \
                       instagram, facebook, linkedin, tiktok, youtube, photo_url, cover_url, \
                       design_type, primary_color, secondary_color, unique_link, is_archived, \
                       subscription_start, created_at, updated_at";

const RENEWAL_PERIOD_DAYS: i64 = 365;
const EXPIRING_WINDOW_DAYS: i64 = 30;

/// A profile is "expiring" when its yearly renewal falls strictly after `now`
/// and at or before `now + 30 days`. Recomputed at query time, never stored.
pub fn renewal_due_within(subscription_start: OffsetDateTime, now: OffsetDateTime) -> bool {
    let renewal = subscription_start + Duration::days(RENEWAL_PERIOD_DAYS);
    now < renewal && renewal <= now + Duration::days(EXPIRING_WINDOW_DAYS)
}

/// Regenerate candidate links until `is_taken` reports a free one. Each
/// attempt re-checks against the store; the loop never assumes the first
/// candidate is free.
async fn reserve_unique_link<F, Fut>(name: &str, mut is_taken: F) -> anyhow::Result<String>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<bool>>,
{
    loop {
        let candidate = generate_unique_link(name);
        if !is_taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
}

impl Profile {
    /// Create a profile for `owner`. The public link is regenerated until no
    /// existing profile holds it; each attempt re-checks against the store.
    pub async fn create(
        db: &PgPool,
        owner: Uuid,
        fields: ProfileCreate,
    ) -> anyhow::Result<Profile> {
        let unique_link = reserve_unique_link(&fields.name, |candidate| {
            let db = db.clone();
            async move {
                let taken =
                    sqlx::query_as::<_, (Uuid,)>("SELECT id FROM profiles WHERE unique_link = $1")
                        .bind(&candidate)
                        .fetch_optional(&db)
                        .await?;
                Ok(taken.is_some())
            }
        })
        .await?;

        let now = OffsetDateTime::now_utc();
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (user_id, name, job, phone, email, company, whatsapp, website, \
                                   address, instagram, facebook, linkedin, tiktok, youtube, \
                                   photo_url, cover_url, design_type, primary_color, \
                                   secondary_color, unique_link, subscription_start, created_at, \
                                   updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                     $18, $19, $20, $21, $22, $23)
             RETURNING {COLUMNS}"
        ))
        .bind(owner)
        .bind(&fields.name)
        .bind(&fields.job)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.company)
        .bind(&fields.whatsapp)
        .bind(&fields.website)
        .bind(&fields.address)
        .bind(&fields.instagram)
        .bind(&fields.facebook)
        .bind(&fields.linkedin)
        .bind(&fields.tiktok)
        .bind(&fields.youtube)
        .bind(&fields.photo_url)
        .bind(&fields.cover_url)
        .bind(&fields.design_type)
        .bind(&fields.primary_color)
        .bind(&fields.secondary_color)
        .bind(&unique_link)
        .bind(now)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    /// Profiles owned by `owner`, newest first. The `Expiring` filter derives
    /// the renewal window in code so it stays in one place.
    pub async fn list_by_owner(
        db: &PgPool,
        owner: Uuid,
        filter: ProfileFilter,
    ) -> anyhow::Result<Vec<Profile>> {
        let rows = match filter {
            ProfileFilter::All => {
                sqlx::query_as::<_, Profile>(&format!(
                    "SELECT {COLUMNS} FROM profiles WHERE user_id = $1 ORDER BY created_at DESC"
                ))
                .bind(owner)
                .fetch_all(db)
                .await?
            }
            ProfileFilter::Archived => {
                sqlx::query_as::<_, Profile>(&format!(
                    "SELECT {COLUMNS} FROM profiles
                     WHERE user_id = $1 AND is_archived
                     ORDER BY created_at DESC"
                ))
                .bind(owner)
                .fetch_all(db)
                .await?
            }
            ProfileFilter::Expiring => {
                let rows = sqlx::query_as::<_, Profile>(&format!(
                    "SELECT {COLUMNS} FROM profiles
                     WHERE user_id = $1 AND NOT is_archived
                     ORDER BY created_at DESC"
                ))
                .bind(owner)
                .fetch_all(db)
                .await?;
                let now = OffsetDateTime::now_utc();
                rows.into_iter()
                    .filter(|p| renewal_due_within(p.subscription_start, now))
                    .collect()
            }
        };
        Ok(rows)
    }

    /// Owner-scoped lookup: a profile owned by someone else comes back `None`,
    /// same as a nonexistent one. The query itself is the authorization check.
    pub async fn get_by_id(
        db: &PgPool,
        id: Uuid,
        owner: Uuid,
    ) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Unscoped lookup for the public vCard endpoint.
    pub async fn get_by_id_any(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile =
            sqlx::query_as::<_, Profile>(&format!("SELECT {COLUMNS} FROM profiles WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(profile)
    }

    /// Public page lookup. Archived profiles stay reachable by slug.
    pub async fn get_by_slug(db: &PgPool, unique_link: &str) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE unique_link = $1"
        ))
        .bind(unique_link)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Merge the non-null patch fields and bump `updated_at`. `None` when no
    /// profile matches the id+owner pair. Callers reject empty patches before
    /// getting here.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        owner: Uuid,
        patch: &ProfileUpdate,
    ) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET
                 name = COALESCE($3, name),
                 job = COALESCE($4, job),
                 phone = COALESCE($5, phone),
                 email = COALESCE($6, email),
                 company = COALESCE($7, company),
                 whatsapp = COALESCE($8, whatsapp),
                 website = COALESCE($9, website),
                 address = COALESCE($10, address),
                 instagram = COALESCE($11, instagram),
                 facebook = COALESCE($12, facebook),
                 linkedin = COALESCE($13, linkedin),
                 tiktok = COALESCE($14, tiktok),
                 youtube = COALESCE($15, youtube),
                 photo_url = COALESCE($16, photo_url),
                 cover_url = COALESCE($17, cover_url),
                 design_type = COALESCE($18, design_type),
                 primary_color = COALESCE($19, primary_color),
                 secondary_color = COALESCE($20, secondary_color),
                 updated_at = $21
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .bind(&patch.name)
        .bind(&patch.job)
        .bind(&patch.phone)
        .bind(&patch.email)
        .bind(&patch.company)
        .bind(&patch.whatsapp)
        .bind(&patch.website)
        .bind(&patch.address)
        .bind(&patch.instagram)
        .bind(&patch.facebook)
        .bind(&patch.linkedin)
        .bind(&patch.tiktok)
        .bind(&patch.youtube)
        .bind(&patch.photo_url)
        .bind(&patch.cover_url)
        .bind(&patch.design_type)
        .bind(&patch.primary_color)
        .bind(&patch.secondary_color)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Flip the archive flag in place, returning the new state. `None` when
    /// the id+owner pair matches nothing.
    pub async fn toggle_archive(
        db: &PgPool,
        id: Uuid,
        owner: Uuid,
    ) -> anyhow::Result<Option<bool>> {
        let new_state = sqlx::query_as::<_, (bool,)>(
            "UPDATE profiles
             SET is_archived = NOT is_archived, updated_at = $3
             WHERE id = $1 AND user_id = $2
             RETURNING is_archived",
        )
        .bind(id)
        .bind(owner)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(db)
        .await?;
        Ok(new_state.map(|(state,)| state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_ago(days: i64) -> OffsetDateTime {
        OffsetDateTime::now_utc() - Duration::days(days)
    }

    #[test]
    fn renewal_inside_window_is_expiring() {
        let now = OffsetDateTime::now_utc();
        // renewal in 25 days
        assert!(renewal_due_within(days_ago(340), now));
        // renewal in 1 day
        assert!(renewal_due_within(days_ago(364), now));
    }

    #[test]
    fn renewal_far_away_is_not_expiring() {
        let now = OffsetDateTime::now_utc();
        // renewal in 65 days
        assert!(!renewal_due_within(days_ago(300), now));
        assert!(!renewal_due_within(now, now));
    }

    #[test]
    fn past_renewal_is_not_expiring() {
        // Capture the starts before `now` so the 365-day boundary lands at or
        // before `now` even though `days_ago` reads the clock again.
        let start_366 = days_ago(366);
        let start_365 = days_ago(365);
        let now = OffsetDateTime::now_utc();
        assert!(!renewal_due_within(start_366, now));
        // renewal exactly now is already past the strict lower bound
        assert!(!renewal_due_within(start_365, now));
    }

    #[tokio::test]
    async fn link_regenerated_until_no_collision() {
        let mut attempts = 0;
        let link = reserve_unique_link("Jean Dupont", |_candidate| {
            attempts += 1;
            let taken = attempts <= 3;
            async move { Ok(taken) }
        })
        .await
        .expect("reserve link");

        assert_eq!(attempts, 4);
        assert!(link.starts_with("jean-dupont-"));
    }

    #[tokio::test]
    async fn first_free_candidate_is_kept() {
        let mut attempts = 0;
        reserve_unique_link("Jean Dupont", |_candidate| {
            attempts += 1;
            async move { Ok(false) }
        })
        .await
        .expect("reserve link");

        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn colliding_candidates_are_not_reused() {
        let mut seen: Vec<String> = Vec::new();
        reserve_unique_link("Jean Dupont", |candidate| {
            let taken = seen.len() < 2;
            seen.push(candidate);
            async move { Ok(taken) }
        })
        .await
        .expect("reserve link");

        assert_eq!(seen.len(), 3);
        assert_ne!(seen[0], seen[1]);
        assert_ne!(seen[1], seen[2]);
    }

    #[test]
    fn window_upper_bound_is_inclusive() {
        let now = OffsetDateTime::now_utc();
        // renewal exactly at now + 30 days
        let at_bound = now - Duration::days(RENEWAL_PERIOD_DAYS - EXPIRING_WINDOW_DAYS);
        assert!(renewal_due_within(at_bound, now));
        // renewal at now + 31 days is outside the window
        assert!(!renewal_due_within(at_bound + Duration::days(1), now));
    }
}
