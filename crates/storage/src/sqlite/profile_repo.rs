use swim_core::model::{AuthSession, Profile, ProfileUpdate};

use super::SqliteRepository;
use super::mapping::{conn, map_profile_row, onboarding_to_json};
use crate::repository::{ProfileRepository, StorageError};

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn get(&self, session: &AuthSession) -> Result<Option<Profile>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, email, full_name, avatar_url, onboarding, updated_at
            FROM profiles WHERE id = ?1
            ",
        )
        .bind(session.user_id().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_profile_row).transpose()
    }

    async fn update(
        &self,
        session: &AuthSession,
        update: &ProfileUpdate,
    ) -> Result<Profile, StorageError> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let existing = sqlx::query(
            r"
            SELECT id, email, full_name, avatar_url, onboarding, updated_at
            FROM profiles WHERE id = ?1
            ",
        )
        .bind(session.user_id().to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(conn)?;

        let mut profile = match existing {
            Some(row) => map_profile_row(&row)?,
            None => Profile::empty(session.user_id(), now),
        };
        profile.apply(update, now);

        sqlx::query(
            r"
            INSERT INTO profiles (id, email, full_name, avatar_url, onboarding, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                full_name = excluded.full_name,
                avatar_url = excluded.avatar_url,
                onboarding = excluded.onboarding,
                updated_at = excluded.updated_at
            ",
        )
        .bind(profile.id.to_string())
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(&profile.avatar_url)
        .bind(onboarding_to_json(&profile.onboarding)?)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        Ok(profile)
    }
}
