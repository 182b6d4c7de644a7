use crate::app::clients::SpotifyClient;
use crate::config::credentials::SpotifyUserToken;
use crate::config::RecentlyPlayedConfig;
use crate::core::transform::{flatten_recently_played, rows_to_csv};
use crate::domain::model::{PlayedItem, PlayedRow};
use crate::domain::ports::{Pipeline, Storage};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// 只抓取最近 24 小時的播放記錄
pub const RECENT_WINDOW_HOURS: i64 = 24;

const STALE_AFTER_DAYS: i64 = 7;

/// Listening-history ETL: fetch the user's plays from the last 24 hours and
/// write one CSV row per play.
pub struct RecentlyPlayedPipeline<S: Storage> {
    storage: S,
    config: RecentlyPlayedConfig,
    user_token: SpotifyUserToken,
    client: SpotifyClient,
}

impl<S: Storage> RecentlyPlayedPipeline<S> {
    pub fn new(
        storage: S,
        config: RecentlyPlayedConfig,
        user_token: SpotifyUserToken,
        client: SpotifyClient,
    ) -> Self {
        Self {
            storage,
            config,
            user_token,
            client,
        }
    }
}

/// `played_at` 是上游的主鍵，重複即資料異常
pub fn validate_played_rows(rows: &[PlayedRow]) -> Result<()> {
    if rows.is_empty() {
        tracing::warn!("No songs downloaded in the window, writing header-only output");
        return Ok(());
    }

    let mut seen = HashSet::new();
    for row in rows {
        if !seen.insert(row.played_at.as_str()) {
            return Err(EtlError::ValidationError {
                message: format!("Duplicate played_at timestamp: {}", row.played_at),
            });
        }
    }

    let stale_cutoff = Utc::now() - Duration::days(STALE_AFTER_DAYS);
    let stale = rows
        .iter()
        .filter_map(|row| DateTime::parse_from_rfc3339(&row.played_at).ok())
        .filter(|played_at| played_at.with_timezone(&Utc) < stale_cutoff)
        .count();
    if stale > 0 {
        tracing::warn!("Found {} tracks older than {} days", stale, STALE_AFTER_DAYS);
    }

    Ok(())
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for RecentlyPlayedPipeline<S> {
    type Raw = PlayedItem;
    type Row = PlayedRow;

    fn name(&self) -> &str {
        "recently-played"
    }

    async fn extract(&self) -> Result<Vec<PlayedItem>> {
        let after_ms = (Utc::now() - Duration::hours(RECENT_WINDOW_HOURS)).timestamp_millis();

        self.client
            .recently_played(&self.user_token.token, self.config.limit, after_ms)
            .await
    }

    fn transform(&self, records: Vec<PlayedItem>) -> Result<Vec<PlayedRow>> {
        let rows = flatten_recently_played(&records);
        validate_played_rows(&rows)?;
        Ok(rows)
    }

    async fn load(&self, rows: Vec<PlayedRow>) -> Result<String> {
        let data = rows_to_csv(&rows)?;
        self.storage.write_file(&self.config.output_file, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_row(played_at: &str) -> PlayedRow {
        PlayedRow {
            track_id: "t1".to_string(),
            track_name: "Shivers".to_string(),
            artist_name: "Ed Sheeran".to_string(),
            album_name: "=".to_string(),
            played_at: played_at.to_string(),
            timestamp: played_at.get(..10).unwrap_or("").to_string(),
            duration_ms: 215_000,
            popularity: 80,
        }
    }

    #[test]
    fn test_validate_empty_rows_is_ok() {
        assert!(validate_played_rows(&[]).is_ok());
    }

    #[test]
    fn test_validate_unique_played_at_is_ok() {
        let rows = vec![
            played_row("2024-03-01T07:12:45.123Z"),
            played_row("2024-03-01T07:16:02.456Z"),
        ];
        assert!(validate_played_rows(&rows).is_ok());
    }

    #[test]
    fn test_validate_duplicate_played_at_fails() {
        let rows = vec![
            played_row("2024-03-01T07:12:45.123Z"),
            played_row("2024-03-01T07:12:45.123Z"),
        ];

        let err = validate_played_rows(&rows).unwrap_err();
        match err {
            EtlError::ValidationError { message } => {
                assert!(message.contains("2024-03-01T07:12:45.123Z"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_stale_rows_warn_but_pass() {
        // 超過七天只警告，不讓整批資料失敗
        let rows = vec![played_row("2020-01-01T00:00:00.000Z")];
        assert!(validate_played_rows(&rows).is_ok());
    }
}
