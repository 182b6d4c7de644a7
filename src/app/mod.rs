// Application layer: API clients, concrete pipelines, and the dispatcher
// that assembles a pipeline run from its configuration.

pub mod clients;
pub mod pipelines;

use crate::config::cli::LocalStorage;
use crate::config::credentials::{SpotifyAppCredentials, SpotifyUserToken, TwitterCredentials};
use crate::config::{
    PipelineKind, RecentlyPlayedConfig, RunOptions, TopTracksConfig, TweetsConfig,
};
use crate::core::etl::EtlEngine;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use clients::{SpotifyClient, TwitterClient};
use pipelines::{RecentlyPlayedPipeline, TopTracksPipeline, TweetsPipeline};

/// Run one named pipeline end to end. Output paths starting with `s3://`
/// select the object-store sink, anything else the local CSV sink.
pub async fn run_named_pipeline(kind: PipelineKind, options: &RunOptions) -> Result<String> {
    if options.output_path.starts_with("s3://") {
        #[cfg(feature = "s3")]
        {
            let storage =
                crate::config::s3::S3Storage::from_output_path(&options.output_path).await?;
            return dispatch(kind, options, storage).await;
        }
        #[cfg(not(feature = "s3"))]
        {
            return Err(crate::utils::error::EtlError::ConfigError {
                message: "s3:// output paths require a build with the `s3` feature".to_string(),
            });
        }
    }

    let storage = LocalStorage::new(options.output_path.clone());
    dispatch(kind, options, storage).await
}

async fn dispatch<S: Storage>(
    kind: PipelineKind,
    options: &RunOptions,
    storage: S,
) -> Result<String> {
    match kind {
        PipelineKind::TopTracks => {
            // 憑證載入失敗就不會發出任何網路請求
            let credentials = SpotifyAppCredentials::from_env()?;
            let config = TopTracksConfig::from_env();
            let client = SpotifyClient::new(
                options.spotify_api_base.clone(),
                options.spotify_accounts_base.clone(),
            );

            let pipeline = TopTracksPipeline::new(storage, config, credentials, client);
            EtlEngine::new_with_monitoring(pipeline, options.monitor)
                .run()
                .await
        }
        PipelineKind::RecentlyPlayed => {
            let user_token = SpotifyUserToken::from_env()?;
            let config = RecentlyPlayedConfig::from_env()?;
            let client = SpotifyClient::new(
                options.spotify_api_base.clone(),
                options.spotify_accounts_base.clone(),
            );

            let pipeline = RecentlyPlayedPipeline::new(storage, config, user_token, client);
            EtlEngine::new_with_monitoring(pipeline, options.monitor)
                .run()
                .await
        }
        PipelineKind::Tweets => {
            let credentials = TwitterCredentials::from_env()?;
            let config = TweetsConfig::from_env()?;
            let client = TwitterClient::new(options.twitter_api_base.clone());

            let pipeline = TweetsPipeline::new(storage, config, credentials, client);
            EtlEngine::new_with_monitoring(pipeline, options.monitor)
                .run()
                .await
        }
    }
}
