use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::PlayerProfile;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the single durable player record.
///
/// The record holds the player identity and the bounded session history;
/// it is loaded once on startup and rewritten whole on each append. There
/// are no update/delete operations on individual history entries.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Load the persisted profile, if one has ever been saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read or the
    /// stored document cannot be decoded.
    async fn load_profile(&self) -> Result<Option<PlayerProfile>, StorageError>;

    /// Persist the whole profile record, replacing any previous state.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn save_profile(&self, profile: &PlayerProfile) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    profile: Arc<Mutex<Option<PlayerProfile>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profile: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn load_profile(&self) -> Result<Option<PlayerProfile>, StorageError> {
        let guard = self
            .profile
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_profile(&self, profile: &PlayerProfile) -> Result<(), StorageError> {
        let mut guard = self
            .profile
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(profile.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo);
        Self { profiles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::HistoryRecord;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn round_trips_profile() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_profile().await.unwrap().is_none());

        let mut profile = PlayerProfile::new("Ada");
        profile.record_game(HistoryRecord::new("Ada", 30, 5, 3, fixed_now()).unwrap());
        repo.save_profile(&profile).await.unwrap();

        let loaded = repo.load_profile().await.unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn save_replaces_previous_state() {
        let repo = InMemoryRepository::new();
        repo.save_profile(&PlayerProfile::new("Ada")).await.unwrap();
        repo.save_profile(&PlayerProfile::new("Grace"))
            .await
            .unwrap();

        let loaded = repo.load_profile().await.unwrap().unwrap();
        assert_eq!(loaded.player_name(), "Grace");
    }
}
