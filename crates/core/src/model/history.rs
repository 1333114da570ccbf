use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },
}

/// Summary of one completed quiz session.
///
/// Immutable once created; only ever appended to a player's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    id: Uuid,
    played_at: DateTime<Utc>,
    player_name: String,
    score: u32,
    total_questions: u32,
    correct_count: u32,
}

impl HistoryRecord {
    /// Build a record for a freshly finished session, minting a new id.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::CountMismatch` if `correct_count` exceeds
    /// `total_questions`.
    pub fn new(
        player_name: impl Into<String>,
        score: u32,
        total_questions: u32,
        correct_count: u32,
        played_at: DateTime<Utc>,
    ) -> Result<Self, HistoryError> {
        Self::from_persisted(
            Uuid::new_v4(),
            played_at,
            player_name.into(),
            score,
            total_questions,
            correct_count,
        )
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::CountMismatch` if the counts do not align.
    pub fn from_persisted(
        id: Uuid,
        played_at: DateTime<Utc>,
        player_name: String,
        score: u32,
        total_questions: u32,
        correct_count: u32,
    ) -> Result<Self, HistoryError> {
        if correct_count > total_questions {
            return Err(HistoryError::CountMismatch {
                correct: correct_count,
                total: total_questions,
            });
        }

        Ok(Self {
            id,
            played_at,
            player_name,
            score,
            total_questions,
            correct_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Share of correct answers, rounded to whole percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let ratio = f64::from(self.correct_count) / f64::from(self.total_questions);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (ratio * 100.0).round() as u32
        }
    }
}
