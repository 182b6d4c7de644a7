//! Pure transform stage: raw API records in, fixed-schema flat rows out.
//! No I/O and no clock access, so identical input always produces
//! byte-identical CSV output.

use crate::domain::model::{PlayedItem, PlayedRow, Post, PostRow, Track, TrackRow};
use crate::utils::error::{EtlError, Result};

/// A flat row that knows its fixed column header.
pub trait CsvRow {
    const HEADERS: &'static [&'static str];

    fn record(&self) -> Vec<String>;
}

impl CsvRow for TrackRow {
    const HEADERS: &'static [&'static str] = &[
        "track_id",
        "track_name",
        "artist_name",
        "album_name",
        "release_date",
        "popularity",
        "duration_ms",
        "explicit",
        "external_url",
        "preview_url",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.track_id.clone(),
            self.track_name.clone(),
            self.artist_name.clone(),
            self.album_name.clone(),
            self.release_date.clone(),
            self.popularity.to_string(),
            self.duration_ms.to_string(),
            self.explicit.to_string(),
            self.external_url.clone(),
            self.preview_url.clone(),
        ]
    }
}

impl CsvRow for PlayedRow {
    const HEADERS: &'static [&'static str] = &[
        "track_id",
        "track_name",
        "artist_name",
        "album_name",
        "played_at",
        "timestamp",
        "duration_ms",
        "popularity",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.track_id.clone(),
            self.track_name.clone(),
            self.artist_name.clone(),
            self.album_name.clone(),
            self.played_at.clone(),
            self.timestamp.clone(),
            self.duration_ms.to_string(),
            self.popularity.to_string(),
        ]
    }
}

impl CsvRow for PostRow {
    const HEADERS: &'static [&'static str] = &["post_id", "author", "text", "created_at"];

    fn record(&self) -> Vec<String> {
        vec![
            self.post_id.clone(),
            self.author.clone(),
            self.text.clone(),
            self.created_at.clone(),
        ]
    }
}

pub fn flatten_top_tracks(tracks: &[Track]) -> Vec<TrackRow> {
    tracks
        .iter()
        .map(|track| TrackRow {
            track_id: track.id.clone(),
            track_name: track.name.clone(),
            artist_name: track.primary_artist().to_string(),
            album_name: track.album.name.clone(),
            release_date: track.album.release_date.clone(),
            popularity: track.popularity,
            duration_ms: track.duration_ms,
            explicit: track.explicit,
            external_url: track.external_urls.spotify.clone(),
            preview_url: track.preview_url.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn flatten_recently_played(items: &[PlayedItem]) -> Vec<PlayedRow> {
    items
        .iter()
        .map(|item| {
            // played_at 是 RFC3339，前 10 個字元即日期
            let timestamp = item
                .played_at
                .get(..10)
                .unwrap_or(item.played_at.as_str())
                .to_string();

            PlayedRow {
                track_id: item.track.id.clone(),
                track_name: item.track.name.clone(),
                artist_name: item.track.primary_artist().to_string(),
                album_name: item.track.album.name.clone(),
                played_at: item.played_at.clone(),
                timestamp,
                duration_ms: item.track.duration_ms,
                popularity: item.track.popularity,
            }
        })
        .collect()
}

pub fn flatten_posts(posts: &[Post]) -> Vec<PostRow> {
    posts
        .iter()
        .map(|post| PostRow {
            post_id: post.id.clone(),
            author: post.author.clone(),
            text: post.text.clone(),
            created_at: post.created_at.clone(),
        })
        .collect()
}

/// Encode rows as CSV. The header is always written, so an empty input
/// yields a header-only file.
pub fn rows_to_csv<R: CsvRow>(rows: &[R]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.record())?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::ProcessingError {
            message: format!("CSV buffer error: {}", e),
        })
}
