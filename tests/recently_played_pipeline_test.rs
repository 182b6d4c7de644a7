use httpmock::prelude::*;
use spotify_etl::app::clients::SpotifyClient;
use spotify_etl::app::pipelines::RecentlyPlayedPipeline;
use spotify_etl::config::credentials::SpotifyUserToken;
use spotify_etl::config::RecentlyPlayedConfig;
use spotify_etl::{EtlEngine, EtlError, LocalStorage};
use tempfile::TempDir;

fn test_config() -> RecentlyPlayedConfig {
    RecentlyPlayedConfig {
        limit: 50,
        output_file: "recently_played_tracks.csv".to_string(),
    }
}

fn pipeline_for(
    server: &MockServer,
    output_path: &str,
) -> RecentlyPlayedPipeline<LocalStorage> {
    let storage = LocalStorage::new(output_path.to_string());
    let token = SpotifyUserToken::new("user-token-abc");
    let client = SpotifyClient::new(server.base_url(), server.base_url());
    RecentlyPlayedPipeline::new(storage, test_config(), token, client)
}

fn played_item(track_id: &str, name: &str, played_at: &str) -> serde_json::Value {
    serde_json::json!({
        "track": {
            "id": track_id,
            "name": name,
            "artists": [{"id": "artist-1", "name": "Ed Sheeran"}],
            "album": {"id": "a1", "name": "=", "release_date": "2021-10-29"},
            "popularity": 85,
            "duration_ms": 207853,
            "explicit": false,
            "external_urls": {"spotify": "https://open.spotify.com/track/t1"}
        },
        "played_at": played_at
    })
}

#[tokio::test]
async fn test_recently_played_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let recent_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/me/player/recently-played")
            .query_param("limit", "50")
            .header("authorization", "Bearer user-token-abc");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "items": [
                    played_item("t1", "Shivers", "2024-03-01T07:12:45.123Z"),
                    played_item("t2", "Bad Habits", "2024-03-01T06:55:02.456Z")
                ]
            }));
    });

    let engine = EtlEngine::new(pipeline_for(&server, &output_path));
    let result = engine.run().await.unwrap();

    recent_mock.assert();

    let csv = std::fs::read_to_string(&result).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "track_id,track_name,artist_name,album_name,played_at,timestamp,duration_ms,popularity"
    );
    assert_eq!(
        lines[1],
        "t1,Shivers,Ed Sheeran,=,2024-03-01T07:12:45.123Z,2024-03-01,207853,85"
    );
    assert_eq!(
        lines[2],
        "t2,Bad Habits,Ed Sheeran,=,2024-03-01T06:55:02.456Z,2024-03-01,207853,85"
    );
}

#[tokio::test]
async fn test_empty_history_writes_header_only() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/me/player/recently-played");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"items": []}));
    });

    let engine = EtlEngine::new(pipeline_for(&server, &output_path));
    let result = engine.run().await.unwrap();

    let csv = std::fs::read_to_string(&result).unwrap();
    assert_eq!(
        csv,
        "track_id,track_name,artist_name,album_name,played_at,timestamp,duration_ms,popularity\n"
    );
}

#[tokio::test]
async fn test_duplicate_played_at_fails_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/me/player/recently-played");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "items": [
                    played_item("t1", "Shivers", "2024-03-01T07:12:45.123Z"),
                    played_item("t2", "Bad Habits", "2024-03-01T07:12:45.123Z")
                ]
            }));
    });

    let engine = EtlEngine::new(pipeline_for(&server, &output_path));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::ValidationError { .. }));
    assert!(!temp_dir.path().join("recently_played_tracks.csv").exists());
}

#[tokio::test]
async fn test_expired_user_token_surfaces_as_auth_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/me/player/recently-played");
        then.status(401)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"error": {"status": 401, "message": "The access token expired"}}));
    });

    let engine = EtlEngine::new(pipeline_for(&server, &output_path));
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, EtlError::AuthError { .. }));
}
