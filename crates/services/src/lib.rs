#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod game_service;
pub mod generator;
pub mod session;

pub use quiz_core::Clock;

pub use catalog::{CatalogClient, CatalogConfig, MxmCatalogClient, RetryPolicy};
pub use error::{CatalogError, GameError, GenerationError};
pub use game_service::GameService;
pub use generator::QuestionGenerator;
pub use session::{
    AdvanceOutcome, AnswerOutcome, GameProgress, GameSession, GameStatus, POINTS_PER_CORRECT,
};
