use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use quiz_core::model::{Artist, ArtistId, PlayerProfile, Snippet, Track, TrackId};
use quiz_core::time::fixed_now;
use services::error::{CatalogError, GameError};
use services::{
    AdvanceOutcome, AnswerOutcome, CatalogClient, Clock, GameService, GameSession, GameStatus,
    QuestionGenerator, POINTS_PER_CORRECT,
};
use storage::repository::{InMemoryRepository, ProfileRepository, StorageError};

#[derive(Default, Clone)]
struct MockCatalog {
    tracks: Vec<Track>,
    artists: Vec<Artist>,
    snippets: HashMap<TrackId, Snippet>,
    fail_charts: bool,
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn fetch_top_tracks(
        &self,
        _region: &str,
        _page: u32,
        _page_size: u32,
    ) -> Result<Vec<Track>, CatalogError> {
        if self.fail_charts {
            return Err(CatalogError::Api { status_code: 503 });
        }
        Ok(self.tracks.clone())
    }

    async fn fetch_top_artists(
        &self,
        _region: &str,
        _page: u32,
        _page_size: u32,
    ) -> Result<Vec<Artist>, CatalogError> {
        if self.fail_charts {
            return Err(CatalogError::Api { status_code: 503 });
        }
        Ok(self.artists.clone())
    }

    async fn fetch_snippet(&self, track_id: TrackId) -> Result<Option<Snippet>, CatalogError> {
        Ok(self.snippets.get(&track_id).cloned())
    }
}

fn usable_catalog(track_count: u64) -> MockCatalog {
    let mut tracks = Vec::new();
    let mut snippets = HashMap::new();
    for id in 1..=track_count {
        tracks.push(Track {
            id: TrackId::new(id),
            name: format!("Song {id}"),
            artist_id: ArtistId::new(id + 100),
            artist_name: format!("Artist {id}"),
            album_name: format!("Album {id}"),
            has_lyrics: true,
            is_instrumental: false,
        });
        snippets.insert(
            TrackId::new(id),
            Snippet {
                track_id: TrackId::new(id),
                body: format!("lyric {id}"),
                is_instrumental: false,
                is_restricted: false,
            },
        );
    }

    let artists = (1..=10)
        .map(|i| Artist {
            id: ArtistId::new(i),
            name: format!("Artist {i}"),
        })
        .collect();

    MockCatalog {
        tracks,
        artists,
        snippets,
        fail_charts: false,
    }
}

/// Repository that can be armed to fail the next N saves.
#[derive(Clone, Default)]
struct FlakyRepository {
    inner: InMemoryRepository,
    failing_saves: Arc<AtomicU32>,
}

impl FlakyRepository {
    fn fail_next_saves(&self, count: u32) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileRepository for FlakyRepository {
    async fn load_profile(&self) -> Result<Option<PlayerProfile>, StorageError> {
        self.inner.load_profile().await
    }

    async fn save_profile(&self, profile: &PlayerProfile) -> Result<(), StorageError> {
        if self
            .failing_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StorageError::Connection("database unavailable".into()));
        }
        self.inner.save_profile(profile).await
    }
}

fn build_service(catalog: MockCatalog, repo: impl ProfileRepository + 'static) -> GameService {
    GameService::new(
        Clock::fixed(fixed_now()),
        QuestionGenerator::new(Arc::new(catalog)),
        Arc::new(repo),
    )
    .with_questions_per_game(3)
}

/// Answer every question correctly and advance to the end.
async fn play_round(service: &GameService, session: &mut GameSession) {
    loop {
        let correct = session
            .current_question()
            .expect("active question")
            .correct_artist_name()
            .to_owned();
        assert_eq!(
            service.submit_answer(session, &correct),
            AnswerOutcome::Correct
        );
        match service.advance(session).await.unwrap() {
            AdvanceOutcome::Next => {}
            AdvanceOutcome::Finished => break,
            AdvanceOutcome::Ignored => panic!("advance ignored mid-round"),
        }
    }
}

#[tokio::test]
async fn full_round_commits_one_history_record() {
    let repo = InMemoryRepository::new();
    let service = build_service(usable_catalog(5), repo.clone());

    service.login("Ada").await.unwrap();

    let mut session = GameSession::new();
    assert!(service.start_game(&mut session).await.unwrap());
    assert_eq!(session.status(), GameStatus::InProgress);
    assert_eq!(session.total_questions(), 3);

    play_round(&service, &mut session).await;

    assert_eq!(session.status(), GameStatus::Finished);
    assert_eq!(session.score(), 3 * POINTS_PER_CORRECT);
    let record_id = session.record_id().expect("record committed");

    let history = service.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id(), record_id);
    assert_eq!(history[0].player_name(), "Ada");
    assert_eq!(history[0].total_questions(), 3);
    assert_eq!(history[0].correct_count(), 3);
    assert_eq!(history[0].score(), 3 * POINTS_PER_CORRECT);

    // A finished session cannot commit twice.
    assert_eq!(
        service.advance(&mut session).await.unwrap(),
        AdvanceOutcome::Ignored
    );
    assert_eq!(service.history().await.unwrap().len(), 1);
}

#[tokio::test]
async fn commit_outage_is_recovered_by_retrying_advance() {
    let repo = FlakyRepository::default();
    let service = build_service(usable_catalog(5), repo.clone());
    service.login("Ada").await.unwrap();

    let mut session = GameSession::new();
    service.start_game(&mut session).await.unwrap();

    // Answer everything, then fail the save that commits the round.
    for _ in 0..session.total_questions() {
        let correct = session
            .current_question()
            .unwrap()
            .correct_artist_name()
            .to_owned();
        session.submit_answer(&correct);
        if session.current_index() + 1 == session.total_questions() {
            repo.fail_next_saves(1);
        }
        match service.advance(&mut session).await {
            Ok(AdvanceOutcome::Next) => {}
            Ok(outcome) => panic!("unexpected outcome {outcome:?}"),
            Err(err) => {
                assert!(matches!(err, GameError::Storage(_)));
            }
        }
    }

    // The round finished but the record is still uncommitted.
    assert_eq!(session.status(), GameStatus::Finished);
    assert!(session.record_id().is_none());
    assert!(service.history().await.unwrap().is_empty());

    // Once the outage clears, advancing again re-attempts the append.
    assert_eq!(
        service.advance(&mut session).await.unwrap(),
        AdvanceOutcome::Ignored
    );
    assert!(session.record_id().is_some());

    let history = service.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score(), 3 * POINTS_PER_CORRECT);

    // And the commit stays exactly-once on further advances.
    service.advance(&mut session).await.unwrap();
    assert_eq!(service.history().await.unwrap().len(), 1);
}

#[tokio::test]
async fn zero_question_round_does_not_wedge_loading() {
    let repo = InMemoryRepository::new();
    let service = GameService::new(
        Clock::fixed(fixed_now()),
        QuestionGenerator::new(Arc::new(usable_catalog(5))),
        Arc::new(repo),
    )
    .with_questions_per_game(0);

    let mut session = GameSession::new();
    assert!(!service.start_game(&mut session).await.unwrap());
    assert_eq!(session.status(), GameStatus::Idle);
    assert!(session.last_error().is_some());

    // The in-flight guard must not swallow the next attempt.
    assert!(!service.start_game(&mut session).await.unwrap());
    assert_eq!(session.status(), GameStatus::Idle);
}

#[tokio::test]
async fn generation_failure_returns_session_to_idle() {
    let repo = InMemoryRepository::new();
    let catalog = MockCatalog {
        fail_charts: true,
        ..usable_catalog(5)
    };
    let service = build_service(catalog, repo);

    let mut session = GameSession::new();
    let err = service.start_game(&mut session).await.unwrap_err();
    assert!(matches!(err, GameError::Generation(_)));

    assert_eq!(session.status(), GameStatus::Idle);
    assert!(session.last_error().is_some());
    assert_eq!(session.total_questions(), 0);
}

#[tokio::test]
async fn start_while_loading_is_ignored() {
    let repo = InMemoryRepository::new();
    let service = build_service(usable_catalog(5), repo);

    let mut session = GameSession::new();
    // Simulate a round already in flight.
    assert!(session.begin_loading());

    let started = service.start_game(&mut session).await.unwrap();
    assert!(!started);
    assert_eq!(session.status(), GameStatus::Loading);
    assert_eq!(session.total_questions(), 0);
}

#[tokio::test]
async fn replay_runs_a_fresh_round_and_appends_again() {
    let repo = InMemoryRepository::new();
    let service = build_service(usable_catalog(5), repo.clone());
    service.login("Ada").await.unwrap();

    let mut session = GameSession::new();
    service.start_game(&mut session).await.unwrap();
    play_round(&service, &mut session).await;
    let first_record = session.record_id().unwrap();

    // Replay re-enters through loading with a clean slate.
    assert!(service.start_game(&mut session).await.unwrap());
    assert_eq!(session.status(), GameStatus::InProgress);
    assert_eq!(session.score(), 0);
    assert!(session.record_id().is_none());

    play_round(&service, &mut session).await;
    let second_record = session.record_id().unwrap();
    assert_ne!(first_record, second_record);

    let history = service.history().await.unwrap();
    assert_eq!(history.len(), 2);
    // Newest first.
    assert_eq!(history[0].id(), second_record);
    assert_eq!(history[1].id(), first_record);
}

#[tokio::test]
async fn logout_clears_identity_but_keeps_history() {
    let repo = InMemoryRepository::new();
    let service = build_service(usable_catalog(5), repo.clone());
    service.login("Ada").await.unwrap();

    let mut session = GameSession::new();
    service.start_game(&mut session).await.unwrap();
    play_round(&service, &mut session).await;

    service.logout(&mut session).await.unwrap();
    assert_eq!(session.status(), GameStatus::Idle);

    let profile = repo.load_profile().await.unwrap().unwrap();
    assert!(!profile.has_player());
    assert_eq!(profile.history().len(), 1);
}

#[tokio::test]
async fn leaderboard_ranks_by_score_without_touching_history() {
    let repo = InMemoryRepository::new();
    let service = build_service(usable_catalog(5), repo);
    service.login("Ada").await.unwrap();

    // Round one: all correct. Round two: all skipped.
    let mut session = GameSession::new();
    service.start_game(&mut session).await.unwrap();
    play_round(&service, &mut session).await;

    service.start_game(&mut session).await.unwrap();
    loop {
        match service.advance(&mut session).await.unwrap() {
            AdvanceOutcome::Next => {}
            AdvanceOutcome::Finished => break,
            AdvanceOutcome::Ignored => panic!("advance ignored mid-round"),
        }
    }

    let history = service.history().await.unwrap();
    assert_eq!(
        history.iter().map(|r| r.score()).collect::<Vec<_>>(),
        vec![0, 3 * POINTS_PER_CORRECT]
    );

    let leaderboard = service.leaderboard().await.unwrap();
    assert_eq!(
        leaderboard.iter().map(|r| r.score()).collect::<Vec<_>>(),
        vec![3 * POINTS_PER_CORRECT, 0]
    );

    let last = service.last_game().await.unwrap().unwrap();
    assert_eq!(last.score(), 0);
}
