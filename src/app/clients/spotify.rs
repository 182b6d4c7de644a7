use crate::config::credentials::SpotifyAppCredentials;
use crate::domain::model::{Artist, PlayedItem, Track};
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

/// Thin authenticated wrapper over the streaming service REST API.
/// Pagination and TLS stay inside reqwest; the orchestrator owns retries.
pub struct SpotifyClient {
    http: Client,
    api_base: String,
    accounts_base: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: ArtistPage,
}

#[derive(Default, Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<Artist>,
}

#[derive(Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Deserialize)]
struct RecentlyPlayedResponse {
    #[serde(default)]
    items: Vec<PlayedItem>,
}

/// 401/403 表示憑證被上游拒絕，其餘非 2xx 走一般 API 錯誤
fn ensure_authorized(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(EtlError::AuthError {
            message: format!("{} from {}", status, response.url()),
        });
    }
    Ok(response.error_for_status()?)
}

impl SpotifyClient {
    pub fn new(api_base: impl Into<String>, accounts_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into(),
            accounts_base: accounts_base.into(),
        }
    }

    /// OAuth2 client-credentials exchange against the accounts host.
    /// One exchange per run; token caching stays out of scope.
    pub async fn request_app_token(&self, credentials: &SpotifyAppCredentials) -> Result<String> {
        let url = format!("{}/api/token", self.accounts_base);

        tracing::debug!("Requesting app token from {}", url);
        let response = self
            .http
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let response = ensure_authorized(response)?;
        let token: TokenResponse = response.json().await?;

        tracing::info!("🔑 Obtained app access token");
        Ok(token.access_token)
    }

    /// Resolve an artist name to the best-matching artist, if any.
    pub async fn search_artist(&self, token: &str, artist_name: &str) -> Result<Option<Artist>> {
        let url = format!("{}/v1/search", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", artist_name), ("type", "artist"), ("limit", "1")])
            .send()
            .await?;

        let response = ensure_authorized(response)?;
        let search: SearchResponse = response.json().await?;

        Ok(search.artists.items.into_iter().next())
    }

    pub async fn top_tracks(
        &self,
        token: &str,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<Track>> {
        let url = format!("{}/v1/artists/{}/top-tracks", self.api_base, artist_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("market", market)])
            .send()
            .await?;

        let response = ensure_authorized(response)?;
        let top: TopTracksResponse = response.json().await?;

        tracing::debug!("Fetched {} top tracks for artist {}", top.tracks.len(), artist_id);
        Ok(top.tracks)
    }

    /// Listening history since `after_ms` (unix epoch milliseconds).
    /// Requires a user token; the app token cannot read user history.
    pub async fn recently_played(
        &self,
        user_token: &str,
        limit: usize,
        after_ms: i64,
    ) -> Result<Vec<PlayedItem>> {
        let url = format!("{}/v1/me/player/recently-played", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(user_token)
            .query(&[
                ("after", after_ms.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let response = ensure_authorized(response)?;
        let recent: RecentlyPlayedResponse = response.json().await?;

        tracing::debug!("Fetched {} recently played items", recent.items.len());
        Ok(recent.items)
    }
}
