//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{HistoryError, QuestionError};
use storage::repository::StorageError;

/// Errors emitted by the catalog client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("catalog api reported status code {status_code}")]
    Api { status_code: u32 },
    #[error("invalid catalog url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl CatalogError {
    /// Whether the failure is worth retrying at the transport layer.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::HttpStatus(status) => status.is_server_error(),
            CatalogError::Http(err) => !err.is_builder() && !err.is_decode(),
            CatalogError::Api { .. } | CatalogError::Url(_) => false,
        }
    }
}

/// Errors emitted by `QuestionGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("assembled only {built} of {requested} questions")]
    InsufficientQuestions { requested: usize, built: usize },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Errors emitted by `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
