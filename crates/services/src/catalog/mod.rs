use async_trait::async_trait;

use quiz_core::model::{Artist, Snippet, Track, TrackId};

use crate::error::CatalogError;

mod client;
mod config;
mod retry;

pub use client::MxmCatalogClient;
pub use config::CatalogConfig;
pub use retry::RetryPolicy;

/// Contract for the remote song/artist catalog.
///
/// Implementations are expected to apply the transport retry policy
/// internally; callers only see the final outcome of a request.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of the top-tracks chart for a region, restricted to
    /// lyrics-bearing tracks.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the request fails after retries or the
    /// catalog reports a non-success payload.
    async fn fetch_top_tracks(
        &self,
        region: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Track>, CatalogError>;

    /// Fetch one page of the top-artists chart for a region.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the request fails after retries or the
    /// catalog reports a non-success payload.
    async fn fetch_top_artists(
        &self,
        region: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Artist>, CatalogError>;

    /// Fetch the lyric snippet for a track.
    ///
    /// Absence is a normal outcome (`Ok(None)`), not an error: the catalog
    /// simply has no snippet for some tracks.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only for transport-level failures.
    async fn fetch_snippet(&self, track_id: TrackId) -> Result<Option<Snippet>, CatalogError>;
}
