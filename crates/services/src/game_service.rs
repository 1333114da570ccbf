use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{HistoryRecord, PlayerProfile};
use storage::repository::ProfileRepository;

use crate::error::GameError;
use crate::generator::QuestionGenerator;
use crate::session::{AdvanceOutcome, AnswerOutcome, GameSession, GameStatus};

/// Questions per round unless configured otherwise.
pub const QUESTIONS_PER_GAME: usize = 5;

const DEFAULT_REGION: &str = "us";

/// Orchestrates the session lifecycle against the generator and the
/// persisted player profile.
///
/// The session itself stays owned by the caller; this service drives its
/// transitions and commits finished rounds into durable history.
pub struct GameService {
    clock: Clock,
    generator: QuestionGenerator,
    profiles: Arc<dyn ProfileRepository>,
    questions_per_game: usize,
    region: String,
}

impl GameService {
    #[must_use]
    pub fn new(
        clock: Clock,
        generator: QuestionGenerator,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            clock,
            generator,
            profiles,
            questions_per_game: QUESTIONS_PER_GAME,
            region: DEFAULT_REGION.into(),
        }
    }

    #[must_use]
    pub fn with_questions_per_game(mut self, count: usize) -> Self {
        self.questions_per_game = count;
        self
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    async fn load_or_default(&self) -> Result<PlayerProfile, GameError> {
        Ok(self.profiles.load_profile().await?.unwrap_or_default())
    }

    /// Set the player identity and persist it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` on persistence failures.
    pub async fn login(&self, name: &str) -> Result<PlayerProfile, GameError> {
        let mut profile = self.load_or_default().await?;
        profile.set_player_name(name);
        self.profiles.save_profile(&profile).await?;
        Ok(profile)
    }

    /// The persisted profile (identity + history), or an empty default.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` on load failures.
    pub async fn profile(&self) -> Result<PlayerProfile, GameError> {
        self.load_or_default().await
    }

    /// Begin a new round: load questions and move the session to playing.
    ///
    /// Re-entrant calls while a round is already loading are ignored and
    /// return `Ok(false)`. On generation failure the session returns to
    /// idle with the error message retained, and the error propagates. An
    /// empty generated sequence also returns the session to idle.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Generation` when the question sequence cannot
    /// be assembled.
    pub async fn start_game(&self, session: &mut GameSession) -> Result<bool, GameError> {
        if !session.begin_loading() {
            return Ok(false);
        }

        match self
            .generator
            .generate(self.questions_per_game, &self.region)
            .await
        {
            Ok(questions) => {
                if session.install_questions(questions) {
                    Ok(true)
                } else {
                    // An empty sequence must not leave the session wedged
                    // in loading; stale installs make this a no-op.
                    session.fail_loading("no questions were generated");
                    Ok(false)
                }
            }
            Err(err) => {
                session.fail_loading(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Record an answer for the current question. Pure pass-through; the
    /// score only becomes durable when the finished round is committed.
    pub fn submit_answer(&self, session: &mut GameSession, option: &str) -> AnswerOutcome {
        session.submit_answer(option)
    }

    /// Advance the session, committing a history record when the round
    /// finishes.
    ///
    /// The commit happens exactly once per round: advancing past the final
    /// question appends one record to the profile (evicting the oldest
    /// beyond the cap) and persists it. If persistence fails, the record
    /// remains uncommitted and the next `advance` on the finished session
    /// re-attempts the append.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the finished round cannot be
    /// persisted, and `GameError::History` if the tallies are inconsistent.
    pub async fn advance(&self, session: &mut GameSession) -> Result<AdvanceOutcome, GameError> {
        let outcome = session.advance();

        if session.status() == GameStatus::Finished && session.record_id().is_none() {
            let mut profile = self.load_or_default().await?;
            let record = session.build_record(profile.player_name(), self.clock.now())?;
            let record_id = record.id();
            profile.record_game(record);
            self.profiles.save_profile(&profile).await?;
            session.set_record_id(record_id);
        }

        Ok(outcome)
    }

    /// Abandon the current round, returning the session to idle.
    pub fn reset_game(&self, session: &mut GameSession) {
        session.reset();
    }

    /// Reset the session and clear the persisted player identity.
    ///
    /// Played history survives logout.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` on persistence failures.
    pub async fn logout(&self, session: &mut GameSession) -> Result<(), GameError> {
        session.reset();
        let mut profile = self.load_or_default().await?;
        profile.clear_player();
        self.profiles.save_profile(&profile).await?;
        Ok(())
    }

    /// Finished sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` on load failures.
    pub async fn history(&self) -> Result<Vec<HistoryRecord>, GameError> {
        Ok(self.load_or_default().await?.history().to_vec())
    }

    /// Finished sessions re-ranked by score, best first. Read-only over
    /// the stored order.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` on load failures.
    pub async fn leaderboard(&self) -> Result<Vec<HistoryRecord>, GameError> {
        let profile = self.load_or_default().await?;
        Ok(profile.ranked_by_score().into_iter().cloned().collect())
    }

    /// The most recently finished session, if any.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` on load failures.
    pub async fn last_game(&self) -> Result<Option<HistoryRecord>, GameError> {
        Ok(self.load_or_default().await?.last_game().cloned())
    }
}
