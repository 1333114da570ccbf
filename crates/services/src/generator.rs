use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Artist, QuizQuestion, Track};

use crate::catalog::CatalogClient;
use crate::error::GenerationError;

/// Page size requested from both chart endpoints.
pub const CHART_PAGE_SIZE: u32 = 50;

/// Number of wrong options accompanying the correct artist.
const DISTRACTOR_COUNT: usize = 2;

/// Assembles validated quiz questions from the remote catalog.
///
/// One generator call performs exactly two concurrent chart fetches; every
/// snippet fetch afterwards is sequential because each candidate is only
/// chosen after the previous one was accepted or rejected.
pub struct QuestionGenerator {
    catalog: Arc<dyn CatalogClient>,
    page_size: u32,
}

impl QuestionGenerator {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            page_size: CHART_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Generate exactly `count` questions for the given chart region.
    ///
    /// Candidates are rejection-sampled from the non-instrumental chart
    /// pool as a uniformly shuffled permutation walk: each track is drawn
    /// at most once, so the attempt budget equals the pool size and no two
    /// questions can share a track. Candidates failing validation consume
    /// their attempt and are not retried.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Catalog` if either chart fetch fails, and
    /// `GenerationError::InsufficientQuestions` when fewer than `count`
    /// valid questions could be assembled within the attempt budget. A
    /// shorter sequence is never returned.
    pub async fn generate(
        &self,
        count: usize,
        region: &str,
    ) -> Result<Vec<QuizQuestion>, GenerationError> {
        let (tracks, artists) = tokio::try_join!(
            self.catalog.fetch_top_tracks(region, 1, self.page_size),
            self.catalog.fetch_top_artists(region, 1, self.page_size),
        )?;

        let pool: Vec<Track> = tracks
            .into_iter()
            .filter(|track| !track.is_instrumental)
            .collect();
        if pool.is_empty() {
            return Err(GenerationError::InsufficientQuestions {
                requested: count,
                built: 0,
            });
        }

        let mut order: Vec<usize> = (0..pool.len()).collect();
        {
            let mut rng = rand::rng();
            order.shuffle(&mut rng);
        }

        let mut questions: Vec<QuizQuestion> = Vec::with_capacity(count);
        for &index in &order {
            if questions.len() >= count {
                break;
            }
            if let Some(question) = self.build_question(&pool[index], &artists).await? {
                questions.push(question);
            }
        }

        if questions.len() < count {
            return Err(GenerationError::InsufficientQuestions {
                requested: count,
                built: questions.len(),
            });
        }

        Ok(questions)
    }

    /// Try to build one question for a candidate track.
    ///
    /// Returns `Ok(None)` for recoverable rejections: missing or unusable
    /// snippet, or fewer than two distinct distractor names.
    async fn build_question(
        &self,
        track: &Track,
        artists: &[Artist],
    ) -> Result<Option<QuizQuestion>, GenerationError> {
        let snippet = match self.catalog.fetch_snippet(track.id).await {
            Ok(snippet) => snippet,
            Err(err) => {
                log::warn!("snippet fetch failed for track {}: {err}", track.id);
                None
            }
        };

        let Some(snippet) = snippet else {
            return Ok(None);
        };
        if !snippet.is_usable() {
            return Ok(None);
        }

        let mut rng = rand::rng();
        let Some(distractors) = pick_distractors(artists, &track.artist_name, &mut rng) else {
            return Ok(None);
        };
        let options = compose_options(&track.artist_name, distractors, &mut rng);

        let question = QuizQuestion::new(
            track.id,
            track.name.clone(),
            snippet.body,
            track.artist_name.clone(),
            options,
        )?;
        Ok(Some(question))
    }
}

/// Pick two distinct distractor names, excluding the correct artist.
///
/// Uses an unbiased shuffle over the deduplicated name pool; returns `None`
/// when fewer than two candidates remain.
fn pick_distractors(
    artists: &[Artist],
    correct_name: &str,
    rng: &mut impl Rng,
) -> Option<[String; DISTRACTOR_COUNT]> {
    let mut names: Vec<&str> = Vec::with_capacity(artists.len());
    for artist in artists {
        if artist.name != correct_name && !names.contains(&artist.name.as_str()) {
            names.push(&artist.name);
        }
    }
    if names.len() < DISTRACTOR_COUNT {
        return None;
    }

    names.shuffle(rng);
    Some([names[0].to_owned(), names[1].to_owned()])
}

/// Combine the correct name with the distractors and shuffle the final
/// option order with an unbiased Fisher-Yates shuffle.
fn compose_options(
    correct_name: &str,
    distractors: [String; DISTRACTOR_COUNT],
    rng: &mut impl Rng,
) -> Vec<String> {
    let [first, second] = distractors;
    let mut options = vec![correct_name.to_owned(), first, second];
    options.shuffle(rng);
    options
}
