use crate::utils::error::{EtlError, Result};
use std::env;
use std::fmt;

pub const SPOTIFY_CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const SPOTIFY_USER_TOKEN_VAR: &str = "SPOTIFY_USER_TOKEN";
pub const TWITTER_BEARER_TOKEN_VAR: &str = "TWITTER_BEARER_TOKEN";

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EtlError::MissingConfigError {
            field: name.to_string(),
        }),
    }
}

/// Client-credentials pair for the app token exchange.
/// Held in memory for the lifetime of the run, never persisted.
#[derive(Clone)]
pub struct SpotifyAppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl SpotifyAppCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require_env(SPOTIFY_CLIENT_ID_VAR)?,
            client_secret: require_env(SPOTIFY_CLIENT_SECRET_VAR)?,
        })
    }
}

impl fmt::Debug for SpotifyAppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyAppCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// User bearer token for the listening-history endpoint.
#[derive(Clone)]
pub struct SpotifyUserToken {
    pub token: String,
}

impl SpotifyUserToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: require_env(SPOTIFY_USER_TOKEN_VAR)?,
        })
    }
}

impl fmt::Debug for SpotifyUserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyUserToken")
            .field("token", &"***")
            .finish()
    }
}

/// Bearer token for the social API.
#[derive(Clone)]
pub struct TwitterCredentials {
    pub bearer_token: String,
}

impl TwitterCredentials {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bearer_token: require_env(TWITTER_BEARER_TOKEN_VAR)?,
        })
    }
}

impl fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("bearer_token", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // 測試共用行程環境，需要序列化存取
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_from_env_with_all_variables_set() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(SPOTIFY_CLIENT_ID_VAR, "id-123");
        env::set_var(SPOTIFY_CLIENT_SECRET_VAR, "secret-456");

        let creds = SpotifyAppCredentials::from_env().unwrap();
        assert_eq!(creds.client_id, "id-123");
        assert_eq!(creds.client_secret, "secret-456");

        env::remove_var(SPOTIFY_CLIENT_ID_VAR);
        env::remove_var(SPOTIFY_CLIENT_SECRET_VAR);
    }

    #[test]
    fn test_from_env_missing_variable_fails_fast() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(TWITTER_BEARER_TOKEN_VAR);

        let err = TwitterCredentials::from_env().unwrap_err();
        match err {
            EtlError::MissingConfigError { field } => {
                assert_eq!(field, TWITTER_BEARER_TOKEN_VAR)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_env_blank_variable_fails_fast() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(SPOTIFY_USER_TOKEN_VAR, "   ");

        assert!(SpotifyUserToken::from_env().is_err());

        env::remove_var(SPOTIFY_USER_TOKEN_VAR);
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = SpotifyAppCredentials::new("public-id", "very-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("public-id"));
        assert!(!debug.contains("very-secret"));

        let token = SpotifyUserToken::new("user-token-abc");
        assert!(!format!("{:?}", token).contains("user-token-abc"));
    }
}
