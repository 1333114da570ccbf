use serde::{Deserialize, Serialize};

use crate::model::{ArtistId, TrackId};

/// A charted track as reported by the remote catalog.
///
/// Sourced read-only; never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub album_name: String,
    pub has_lyrics: bool,
    pub is_instrumental: bool,
}

impl Track {
    /// Whether the track can anchor a lyric question at all.
    #[must_use]
    pub fn is_lyric_eligible(&self) -> bool {
        self.has_lyrics && !self.is_instrumental
    }
}

/// A charted artist, used only as a distractor-name pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
}

/// A short lyric excerpt for one track.
///
/// Fetched lazily per candidate and discarded after question construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub track_id: TrackId,
    pub body: String,
    pub is_instrumental: bool,
    pub is_restricted: bool,
}

impl Snippet {
    /// A snippet is usable as a question prompt only when it carries
    /// actual lyric text.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.is_instrumental && !self.body.trim().is_empty()
    }
}
