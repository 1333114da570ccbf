use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use quiz_core::model::{HistoryError, HistoryRecord, QuizQuestion};

/// Fixed award for a correctly answered question.
pub const POINTS_PER_CORRECT: u32 = 10;

/// Lifecycle of one quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Idle,
    Loading,
    InProgress,
    Finished,
}

/// Result of submitting an answer for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// The question was already answered, or no question is active.
    /// A defensive no-op, not an error.
    Ignored,
}

/// Result of advancing past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next,
    Finished,
    Ignored,
}

/// Aggregated view of session progress, useful for display collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameProgress {
    pub total: usize,
    pub current: usize,
    pub answered: usize,
    pub is_finished: bool,
}

/// In-memory state machine for one player's quiz session.
///
/// Owned explicitly by the caller and mutated from a single logical
/// timeline; there is no ambient global session. Transitions outside the
/// expected order are ignored rather than treated as errors.
#[derive(Debug, Default)]
pub struct GameSession {
    status: GameStatus,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: u32,
    correct_count: u32,
    answered: Vec<bool>,
    last_error: Option<String>,
    record_id: Option<Uuid>,
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Error message from the last failed loading round, kept for display.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Id of the committed history record once the session finished.
    #[must_use]
    pub fn record_id(&self) -> Option<Uuid> {
        self.record_id
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.status == GameStatus::InProgress {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    /// Whether the current question already received an answer.
    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.answered.get(self.current_index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn progress(&self) -> GameProgress {
        GameProgress {
            total: self.questions.len(),
            current: self.current_index,
            answered: self.answered.iter().filter(|a| **a).count(),
            is_finished: self.status == GameStatus::Finished,
        }
    }

    /// Enter the loading state for a fresh round.
    ///
    /// Clears score, cursor and any stale question sequence, so a replay
    /// always re-enters through loading with a clean slate. Returns `false`
    /// while a round is already loading: that is the generation-in-flight
    /// guard, and the call is a no-op.
    pub fn begin_loading(&mut self) -> bool {
        if self.status == GameStatus::Loading {
            return false;
        }

        self.status = GameStatus::Loading;
        self.questions.clear();
        self.answered.clear();
        self.current_index = 0;
        self.score = 0;
        self.correct_count = 0;
        self.last_error = None;
        self.record_id = None;
        true
    }

    /// Install a generated question sequence and start playing.
    ///
    /// Applies only while the session is still loading; results arriving
    /// after a reset or logout are stale and get discarded (`false`).
    pub fn install_questions(&mut self, questions: Vec<QuizQuestion>) -> bool {
        if self.status != GameStatus::Loading || questions.is_empty() {
            return false;
        }

        self.answered = vec![false; questions.len()];
        self.questions = questions;
        self.current_index = 0;
        self.status = GameStatus::InProgress;
        true
    }

    /// Abort a loading round, keeping the error message for display.
    pub fn fail_loading(&mut self, message: impl Into<String>) {
        if self.status != GameStatus::Loading {
            return;
        }
        self.status = GameStatus::Idle;
        self.last_error = Some(message.into());
    }

    /// Record an answer for the current question.
    ///
    /// Accepted at most once per question index; repeated submissions are
    /// no-ops. A correct answer awards [`POINTS_PER_CORRECT`] points.
    pub fn submit_answer(&mut self, option: &str) -> AnswerOutcome {
        if self.status != GameStatus::InProgress || self.is_current_answered() {
            return AnswerOutcome::Ignored;
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return AnswerOutcome::Ignored;
        };

        let correct = question.is_correct(option);
        self.answered[self.current_index] = true;
        if correct {
            self.score += POINTS_PER_CORRECT;
            self.correct_count += 1;
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        }
    }

    /// Move to the next question, or finish the session past the last one.
    ///
    /// Advancing is legal without a submitted answer (a timed-out question
    /// simply scores nothing). Once finished the session is read-only.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.status != GameStatus::InProgress {
            return AdvanceOutcome::Ignored;
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            AdvanceOutcome::Next
        } else {
            self.status = GameStatus::Finished;
            AdvanceOutcome::Finished
        }
    }

    /// Build the history record for a finished session.
    ///
    /// `total_questions` always reflects the installed sequence length.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError` if the tallies are inconsistent.
    pub fn build_record(
        &self,
        player_name: &str,
        played_at: DateTime<Utc>,
    ) -> Result<HistoryRecord, HistoryError> {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        HistoryRecord::new(
            player_name,
            self.score,
            total,
            self.correct_count,
            played_at,
        )
    }

    pub(crate) fn set_record_id(&mut self, id: Uuid) {
        self.record_id = Some(id);
    }

    /// Return to idle, discarding the in-memory question sequence.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStatus::Idle => "idle",
            GameStatus::Loading => "loading",
            GameStatus::InProgress => "inProgress",
            GameStatus::Finished => "finished",
        };
        write!(f, "{name}")
    }
}
