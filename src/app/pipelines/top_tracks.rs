use crate::app::clients::SpotifyClient;
use crate::config::credentials::SpotifyAppCredentials;
use crate::config::TopTracksConfig;
use crate::core::transform::{flatten_top_tracks, rows_to_csv};
use crate::domain::model::{Track, TrackRow};
use crate::domain::ports::{Pipeline, Storage};
use crate::utils::error::{EtlError, Result};

/// Artist top-tracks ETL: resolve the configured artist by name, fetch its
/// top tracks for the configured market, write one CSV row per track.
pub struct TopTracksPipeline<S: Storage> {
    storage: S,
    config: TopTracksConfig,
    credentials: SpotifyAppCredentials,
    client: SpotifyClient,
}

impl<S: Storage> TopTracksPipeline<S> {
    pub fn new(
        storage: S,
        config: TopTracksConfig,
        credentials: SpotifyAppCredentials,
        client: SpotifyClient,
    ) -> Self {
        Self {
            storage,
            config,
            credentials,
            client,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for TopTracksPipeline<S> {
    type Raw = Track;
    type Row = TrackRow;

    fn name(&self) -> &str {
        "top-tracks"
    }

    async fn extract(&self) -> Result<Vec<Track>> {
        let token = self.client.request_app_token(&self.credentials).await?;

        let artist = self
            .client
            .search_artist(&token, &self.config.artist_name)
            .await?
            .ok_or_else(|| EtlError::ProcessingError {
                message: format!("Artist '{}' not found", self.config.artist_name),
            })?;

        tracing::info!("🎤 Resolved artist: {} ({})", artist.name, artist.id);

        let tracks = self
            .client
            .top_tracks(&token, &artist.id, &self.config.market)
            .await?;

        if tracks.is_empty() {
            tracing::warn!(
                "No tracks found for artist '{}' in market {}",
                self.config.artist_name,
                self.config.market
            );
        }

        Ok(tracks)
    }

    fn transform(&self, records: Vec<Track>) -> Result<Vec<TrackRow>> {
        Ok(flatten_top_tracks(&records))
    }

    async fn load(&self, rows: Vec<TrackRow>) -> Result<String> {
        let data = rows_to_csv(&rows)?;
        self.storage.write_file(&self.config.output_file, &data).await
    }
}
