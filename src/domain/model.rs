use serde::Deserialize;

fn default_unknown() -> String {
    "Unknown".to_string()
}

/// Artist as returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_unknown")]
    pub name: String,
}

/// Artist reference embedded in a track.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_unknown")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_unknown")]
    pub name: String,
    #[serde(default)]
    pub release_date: String,
}

impl Default for Album {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: default_unknown(),
            release_date: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

/// 串流服務回傳的原始曲目記錄
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_unknown")]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Album,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl Track {
    /// 第一位演出者的名稱，缺漏時為 "Unknown"
    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown")
    }
}

/// One entry of the listening history: a track plus when it was played.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayedItem {
    pub track: Track,
    #[serde(default)]
    pub played_at: String,
}

/// Post record from the social API, author already resolved to a username.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub text: String,
    pub created_at: String,
}

/// 扁平化後的 top-tracks 輸出列
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub track_id: String,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub release_date: String,
    pub popularity: u32,
    pub duration_ms: u64,
    pub explicit: bool,
    pub external_url: String,
    pub preview_url: String,
}

/// 扁平化後的 recently-played 輸出列
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedRow {
    pub track_id: String,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: String,
    pub played_at: String,
    /// `played_at` 的日期前綴 (YYYY-MM-DD)
    pub timestamp: String,
    pub duration_ms: u64,
    pub popularity: u32,
}

/// 扁平化後的貼文輸出列
#[derive(Debug, Clone, PartialEq)]
pub struct PostRow {
    pub post_id: String,
    pub author: String,
    pub text: String,
    pub created_at: String,
}
