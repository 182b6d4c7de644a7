pub mod cli;
pub mod credentials;
#[cfg(feature = "s3")]
pub mod s3;

use crate::utils::error::{EtlError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com";
pub const DEFAULT_SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
pub const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";

/// The data pipelines that can be registered as workflow tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    TopTracks,
    RecentlyPlayed,
    Tweets,
}

impl PipelineKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "top-tracks" => Some(Self::TopTracks),
            "recently-played" => Some(Self::RecentlyPlayed),
            "tweets" => Some(Self::Tweets),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopTracks => "top-tracks",
            Self::RecentlyPlayed => "recently-played",
            Self::Tweets => "tweets",
        }
    }
}

/// Everything a pipeline run needs besides its secrets, decoupled from the
/// CLI surface so the workflow runner can reuse it.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_path: String,
    pub spotify_api_base: String,
    pub spotify_accounts_base: String,
    pub twitter_api_base: String,
    pub monitor: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            spotify_api_base: DEFAULT_SPOTIFY_API_BASE.to_string(),
            spotify_accounts_base: DEFAULT_SPOTIFY_ACCOUNTS_BASE.to_string(),
            twitter_api_base: DEFAULT_TWITTER_API_BASE.to_string(),
            monitor: false,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_usize_or(name: &str, default: usize) -> Result<usize> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| EtlError::InvalidConfigValueError {
                field: name.to_string(),
                value,
                reason: "Expected a positive integer".to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Knobs for the artist top-tracks pipeline, with the same defaults the
/// scheduler variables used to carry.
#[derive(Debug, Clone)]
pub struct TopTracksConfig {
    pub artist_name: String,
    pub market: String,
    pub output_file: String,
}

impl TopTracksConfig {
    pub fn from_env() -> Self {
        Self {
            artist_name: env_or("SPOTIFY_ARTIST_NAME", "Ed Sheeran"),
            market: env_or("SPOTIFY_MARKET", "US"),
            output_file: env_or("SPOTIFY_OUTPUT_FILE", "songs.csv"),
        }
    }
}

/// Knobs for the listening-history pipeline. The upstream API caps `limit`
/// at 50, so out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone)]
pub struct RecentlyPlayedConfig {
    pub limit: usize,
    pub output_file: String,
}

impl RecentlyPlayedConfig {
    pub fn from_env() -> Result<Self> {
        let limit = env_usize_or("SPOTIFY_RECENT_LIMIT", 50)?;
        Ok(Self {
            limit: limit.clamp(1, 50),
            output_file: env_or("SPOTIFY_RECENT_OUTPUT_FILE", "recently_played_tracks.csv"),
        })
    }
}

/// Knobs for the social posts pipeline. The recent-search endpoint accepts
/// 10 to 100 results per request.
#[derive(Debug, Clone)]
pub struct TweetsConfig {
    pub query: String,
    pub max_results: usize,
    pub output_file: String,
}

impl TweetsConfig {
    pub fn from_env() -> Result<Self> {
        let max_results = env_usize_or("TWITTER_MAX_RESULTS", 10)?;
        Ok(Self {
            query: env_or("TWITTER_SEARCH_QUERY", "spotify"),
            max_results: max_results.clamp(10, 100),
            output_file: env_or("TWITTER_OUTPUT_FILE", "tweets.csv"),
        })
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "spotify-etl")]
#[command(about = "Scheduled ETL pipelines for music listening data")]
pub struct CliConfig {
    /// Pipeline to run: top-tracks, recently-played, tweets, or workflow
    #[arg(value_name = "PIPELINE")]
    pub pipeline: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_SPOTIFY_API_BASE)]
    pub spotify_api_base: String,

    #[arg(long, default_value = DEFAULT_SPOTIFY_ACCOUNTS_BASE)]
    pub spotify_accounts_base: String,

    #[arg(long, default_value = DEFAULT_TWITTER_API_BASE)]
    pub twitter_api_base: String,

    /// Workflow definition executed by the workflow target
    #[arg(long, default_value = "workflows/daily_listening.toml")]
    pub workflow_file: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system resource usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            output_path: self.output_path.clone(),
            spotify_api_base: self.spotify_api_base.clone(),
            spotify_accounts_base: self.spotify_accounts_base.clone(),
            twitter_api_base: self.twitter_api_base.clone(),
            monitor: self.monitor,
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pipeline", &self.pipeline)?;
        validate_path("output_path", &self.output_path)?;
        validate_url("spotify_api_base", &self.spotify_api_base)?;
        validate_url("spotify_accounts_base", &self.spotify_accounts_base)?;
        validate_url("twitter_api_base", &self.twitter_api_base)?;
        validate_path("workflow_file", &self.workflow_file)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_kind_round_trip() {
        for kind in [
            PipelineKind::TopTracks,
            PipelineKind::RecentlyPlayed,
            PipelineKind::Tweets,
        ] {
            assert_eq!(PipelineKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PipelineKind::parse("workflow"), None);
        assert_eq!(PipelineKind::parse("unknown"), None);
    }

    #[test]
    fn test_env_usize_or_rejects_garbage() {
        std::env::set_var("SPOTIFY_ETL_TEST_LIMIT", "not-a-number");
        assert!(env_usize_or("SPOTIFY_ETL_TEST_LIMIT", 50).is_err());
        std::env::remove_var("SPOTIFY_ETL_TEST_LIMIT");

        assert_eq!(env_usize_or("SPOTIFY_ETL_TEST_UNSET", 50).unwrap(), 50);
    }
}
