use crate::domain::model::Post;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;

/// Recent-search wrapper over the social API. Author ids are expanded to
/// usernames in the same request, so callers only ever see resolved posts.
pub struct TwitterClient {
    http: Client,
    api_base: String,
}

#[derive(Default, Deserialize)]
struct RecentSearchResponse {
    #[serde(default)]
    data: Vec<TweetPayload>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Deserialize)]
struct TweetPayload {
    #[serde(default)]
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    author_id: String,
    #[serde(default)]
    created_at: String,
}

#[derive(Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<UserPayload>,
}

#[derive(Deserialize)]
struct UserPayload {
    #[serde(default)]
    id: String,
    #[serde(default)]
    username: String,
}

impl TwitterClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into(),
        }
    }

    pub async fn recent_posts(
        &self,
        bearer_token: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Post>> {
        let url = format!("{}/2/tweets/search/recent", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(bearer_token)
            .query(&[
                ("query", query),
                ("max_results", &max_results.to_string()),
                ("tweet.fields", "created_at,author_id"),
                ("expansions", "author_id"),
                ("user.fields", "username"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(EtlError::AuthError {
                message: format!("{} from {}", status, response.url()),
            });
        }
        let response = response.error_for_status()?;

        let search: RecentSearchResponse = response.json().await?;

        let usernames: HashMap<String, String> = search
            .includes
            .users
            .into_iter()
            .map(|user| (user.id, user.username))
            .collect();

        let posts = search
            .data
            .into_iter()
            .map(|tweet| {
                // 展開的作者資料缺漏時退回原始 id
                let author = usernames
                    .get(&tweet.author_id)
                    .cloned()
                    .unwrap_or_else(|| tweet.author_id.clone());
                Post {
                    id: tweet.id,
                    author,
                    text: tweet.text,
                    created_at: tweet.created_at,
                }
            })
            .collect();

        Ok(posts)
    }
}
