use chrono::Utc;
use sqlx::Row;

use quiz_core::model::PlayerProfile;

use super::SqliteRepository;
use crate::repository::{ProfileRepository, StorageError};

/// Well-known name of the persisted player record.
pub const PROFILE_STATE_NAME: &str = "who-sings-store";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn load_profile(&self) -> Result<Option<PlayerProfile>, StorageError> {
        let row = sqlx::query("SELECT value FROM player_state WHERE name = ?1")
            .bind(PROFILE_STATE_NAME)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row.try_get("value").map_err(ser)?;
        let stored: PlayerProfile = serde_json::from_str(&value).map_err(ser)?;

        // Re-apply the history cap in case the stored document predates it.
        Ok(Some(PlayerProfile::from_persisted(
            stored.player_name().to_owned(),
            stored.history().to_vec(),
        )))
    }

    async fn save_profile(&self, profile: &PlayerProfile) -> Result<(), StorageError> {
        let value = serde_json::to_string(profile).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO player_state (name, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(name) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(PROFILE_STATE_NAME)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
