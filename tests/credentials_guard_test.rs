//! 缺少憑證時必須在發出任何網路請求之前失敗

use httpmock::prelude::*;
use spotify_etl::app;
use spotify_etl::config::{PipelineKind, RunOptions};
use spotify_etl::EtlError;
use std::env;
use std::sync::Mutex;
use tempfile::TempDir;

// Tests in this file mutate shared process environment
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn options_for(server: &MockServer, output_path: &str) -> RunOptions {
    RunOptions {
        output_path: output_path.to_string(),
        spotify_api_base: server.base_url(),
        spotify_accounts_base: server.base_url(),
        twitter_api_base: server.base_url(),
        monitor: false,
    }
}

#[tokio::test]
async fn test_missing_spotify_credentials_fail_before_any_request() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("SPOTIFY_CLIENT_ID");
    env::remove_var("SPOTIFY_CLIENT_SECRET");

    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/api/token");
        then.status(200).json_body(serde_json::json!({"access_token": "x"}));
    });

    let options = options_for(&server, temp_dir.path().to_str().unwrap());
    let err = app::run_named_pipeline(PipelineKind::TopTracks, &options)
        .await
        .unwrap_err();

    match err {
        EtlError::MissingConfigError { field } => assert_eq!(field, "SPOTIFY_CLIENT_ID"),
        other => panic!("unexpected error: {:?}", other),
    }

    token_mock.assert_hits(0);
}

#[tokio::test]
async fn test_missing_user_token_fails_before_any_request() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("SPOTIFY_USER_TOKEN");

    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let recent_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/me/player/recently-played");
        then.status(200).json_body(serde_json::json!({"items": []}));
    });

    let options = options_for(&server, temp_dir.path().to_str().unwrap());
    let err = app::run_named_pipeline(PipelineKind::RecentlyPlayed, &options)
        .await
        .unwrap_err();

    match err {
        EtlError::MissingConfigError { field } => assert_eq!(field, "SPOTIFY_USER_TOKEN"),
        other => panic!("unexpected error: {:?}", other),
    }

    recent_mock.assert_hits(0);
}

#[tokio::test]
async fn test_missing_bearer_token_fails_before_any_request() {
    let _guard = ENV_LOCK.lock().unwrap();
    env::remove_var("TWITTER_BEARER_TOKEN");

    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/2/tweets/search/recent");
        then.status(200).json_body(serde_json::json!({"meta": {"result_count": 0}}));
    });

    let options = options_for(&server, temp_dir.path().to_str().unwrap());
    let err = app::run_named_pipeline(PipelineKind::Tweets, &options)
        .await
        .unwrap_err();

    match err {
        EtlError::MissingConfigError { field } => assert_eq!(field, "TWITTER_BEARER_TOKEN"),
        other => panic!("unexpected error: {:?}", other),
    }

    search_mock.assert_hits(0);
}
