use thiserror::Error;

use crate::model::{HistoryError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    History(#[from] HistoryError),
}
