use thiserror::Error;

use crate::model::TrackId;

/// Number of answer options shown per question (one correct, two distractors).
pub const OPTION_COUNT: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("snippet text is empty")]
    EmptySnippet,

    #[error("expected {expected} options, got {got}")]
    WrongOptionCount { expected: usize, got: usize },

    #[error("answer options contain duplicates")]
    DuplicateOptions,

    #[error("correct artist is missing from the options")]
    CorrectArtistMissing,
}

/// A single multiple-choice question: guess the artist from a lyric snippet.
///
/// Immutable once constructed. The options are already in their final
/// (shuffled) display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    track_id: TrackId,
    track_name: String,
    snippet_text: String,
    correct_artist_name: String,
    options: Vec<String>,
}

impl QuizQuestion {
    /// Build a question, validating the option-set invariants.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the snippet is empty, the option count is
    /// not exactly [`OPTION_COUNT`], the options are not distinct, or the
    /// correct artist is absent from them.
    pub fn new(
        track_id: TrackId,
        track_name: impl Into<String>,
        snippet_text: impl Into<String>,
        correct_artist_name: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let snippet_text = snippet_text.into();
        if snippet_text.trim().is_empty() {
            return Err(QuestionError::EmptySnippet);
        }

        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                expected: OPTION_COUNT,
                got: options.len(),
            });
        }

        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(QuestionError::DuplicateOptions);
            }
        }

        let correct_artist_name = correct_artist_name.into();
        if !options.contains(&correct_artist_name) {
            return Err(QuestionError::CorrectArtistMissing);
        }

        Ok(Self {
            track_id,
            track_name: track_name.into(),
            snippet_text,
            correct_artist_name,
            options,
        })
    }

    #[must_use]
    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    #[must_use]
    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    #[must_use]
    pub fn snippet_text(&self) -> &str {
        &self.snippet_text
    }

    #[must_use]
    pub fn correct_artist_name(&self) -> &str {
        &self.correct_artist_name
    }

    /// Answer options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Whether the given option text names the right artist.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_artist_name == option
    }
}
