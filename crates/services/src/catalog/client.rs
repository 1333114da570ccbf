use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use quiz_core::model::{Artist, ArtistId, Snippet, Track, TrackId};

use super::config::CatalogConfig;
use super::retry::run_with_retry;
use super::CatalogClient;
use crate::error::CatalogError;

const MXM_STATUS_OK: u32 = 200;

/// Catalog client for the Musixmatch chart/snippet API.
#[derive(Clone)]
pub struct MxmCatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl MxmCatalogClient {
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build a client from `WHOSINGS_*` environment variables, if configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        CatalogConfig::from_env().map(Self::new)
    }

    fn api_root(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn get_envelope<B>(&self, endpoint: &str) -> Result<Envelope<B>, CatalogError>
    where
        B: DeserializeOwned,
    {
        let url = self.config.request_url(endpoint)?;
        let http = self.http.clone();

        let response = run_with_retry(
            &self.config.retry,
            || {
                let http = http.clone();
                let url = url.clone();
                async move { http.get(url).send().await.map_err(CatalogError::from) }
            },
            |response: &reqwest::Response| response.status().is_server_error(),
        )
        .await?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status()));
        }

        Ok(response.json::<Envelope<B>>().await?)
    }
}

#[async_trait]
impl CatalogClient for MxmCatalogClient {
    async fn fetch_top_tracks(
        &self,
        region: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Track>, CatalogError> {
        let endpoint = format!(
            "{}/chart.tracks.get?apikey={}&country={region}&chart_name=top&f_has_lyrics=1&page={page}&page_size={page_size}",
            self.api_root(),
            self.config.api_key,
        );

        let envelope: Envelope<ChartTracksBody> = self.get_envelope(&endpoint).await?;
        let header = envelope.message.header;
        if header.status_code != MXM_STATUS_OK {
            return Err(CatalogError::Api {
                status_code: header.status_code,
            });
        }

        Ok(envelope
            .message
            .body
            .track_list
            .into_iter()
            .map(|entry| entry.track.into_track())
            .collect())
    }

    async fn fetch_top_artists(
        &self,
        region: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Artist>, CatalogError> {
        let endpoint = format!(
            "{}/chart.artists.get?apikey={}&country={region}&page={page}&page_size={page_size}",
            self.api_root(),
            self.config.api_key,
        );

        let envelope: Envelope<ChartArtistsBody> = self.get_envelope(&endpoint).await?;
        let header = envelope.message.header;
        if header.status_code != MXM_STATUS_OK {
            return Err(CatalogError::Api {
                status_code: header.status_code,
            });
        }

        Ok(envelope
            .message
            .body
            .artist_list
            .into_iter()
            .map(|entry| entry.artist.into_artist())
            .collect())
    }

    async fn fetch_snippet(&self, track_id: TrackId) -> Result<Option<Snippet>, CatalogError> {
        let endpoint = format!(
            "{}/track.snippet.get?track_id={track_id}&apikey={}",
            self.api_root(),
            self.config.api_key,
        );

        let envelope: Envelope<SnippetBody> = match self.get_envelope(&endpoint).await {
            Ok(envelope) => envelope,
            // A rejected status is treated as "no snippet for this track".
            Err(CatalogError::HttpStatus(_)) => return Ok(None),
            Err(err) => return Err(err),
        };

        if envelope.message.header.status_code != MXM_STATUS_OK {
            return Ok(None);
        }

        Ok(Some(envelope.message.body.snippet.into_snippet(track_id)))
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct Envelope<B> {
    message: Message<B>,
}

#[derive(Debug, Deserialize)]
struct Message<B> {
    header: Header,
    body: B,
}

#[derive(Debug, Deserialize)]
struct Header {
    status_code: u32,
}

#[derive(Debug, Deserialize)]
struct ChartTracksBody {
    track_list: Vec<TrackEntry>,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    track: TrackDto,
}

#[derive(Debug, Clone, Deserialize)]
struct TrackDto {
    track_id: u64,
    track_name: String,
    artist_id: u64,
    artist_name: String,
    #[serde(default)]
    album_name: String,
    #[serde(default)]
    has_lyrics: u8,
    #[serde(default)]
    instrumental: u8,
}

impl TrackDto {
    fn into_track(self) -> Track {
        Track {
            id: TrackId::new(self.track_id),
            name: self.track_name,
            artist_id: ArtistId::new(self.artist_id),
            artist_name: self.artist_name,
            album_name: self.album_name,
            has_lyrics: self.has_lyrics != 0,
            is_instrumental: self.instrumental != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartArtistsBody {
    artist_list: Vec<ArtistEntry>,
}

#[derive(Debug, Deserialize)]
struct ArtistEntry {
    artist: ArtistDto,
}

#[derive(Debug, Clone, Deserialize)]
struct ArtistDto {
    artist_id: u64,
    artist_name: String,
}

impl ArtistDto {
    fn into_artist(self) -> Artist {
        Artist {
            id: ArtistId::new(self.artist_id),
            name: self.artist_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SnippetBody {
    snippet: SnippetDto,
}

#[derive(Debug, Deserialize)]
struct SnippetDto {
    #[serde(default)]
    snippet_body: String,
    #[serde(default)]
    instrumental: u8,
    #[serde(default)]
    restricted: u8,
}

impl SnippetDto {
    fn into_snippet(self, track_id: TrackId) -> Snippet {
        Snippet {
            track_id,
            body: self.snippet_body,
            is_instrumental: self.instrumental != 0,
            is_restricted: self.restricted != 0,
        }
    }
}
