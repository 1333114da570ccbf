mod catalog;
mod history;
mod ids;
mod profile;
mod question;

pub use catalog::{Artist, Snippet, Track};
pub use history::{HistoryError, HistoryRecord};
pub use ids::{ArtistId, ParseIdError, TrackId};
pub use profile::{PlayerProfile, HISTORY_CAP};
pub use question::{QuestionError, QuizQuestion, OPTION_COUNT};
