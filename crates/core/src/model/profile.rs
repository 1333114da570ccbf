use serde::{Deserialize, Serialize};

use crate::model::HistoryRecord;

/// Maximum number of finished sessions retained per player.
pub const HISTORY_CAP: usize = 50;

/// The single durable record per player: identity plus a bounded,
/// newest-first history of finished sessions.
///
/// History is append-only from the player's perspective; once the cap is
/// reached the oldest-inserted record is evicted first, regardless of score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    player_name: String,
    history: Vec<HistoryRecord>,
}

impl PlayerProfile {
    #[must_use]
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            history: Vec::new(),
        }
    }

    /// Rebuild a profile from persisted state, re-applying the history cap
    /// in case the stored document predates it or was tampered with.
    #[must_use]
    pub fn from_persisted(player_name: String, mut history: Vec<HistoryRecord>) -> Self {
        history.truncate(HISTORY_CAP);
        Self {
            player_name,
            history,
        }
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Clear the player identity while keeping the played history.
    pub fn clear_player(&mut self) {
        self.player_name.clear();
    }

    #[must_use]
    pub fn has_player(&self) -> bool {
        !self.player_name.is_empty()
    }

    /// Finished sessions, newest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// The most recently finished session, if any.
    #[must_use]
    pub fn last_game(&self) -> Option<&HistoryRecord> {
        self.history.first()
    }

    /// Append a finished session, evicting the oldest record beyond the cap.
    pub fn record_game(&mut self, record: HistoryRecord) {
        self.history.insert(0, record);
        self.history.truncate(HISTORY_CAP);
    }

    /// History re-ranked by score, best first. Ties keep recency order.
    ///
    /// Read-only view for leaderboard display; the stored order is untouched.
    #[must_use]
    pub fn ranked_by_score(&self) -> Vec<&HistoryRecord> {
        let mut ranked: Vec<&HistoryRecord> = self.history.iter().collect();
        ranked.sort_by(|a, b| b.score().cmp(&a.score()));
        ranked
    }
}
