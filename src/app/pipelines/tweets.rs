use crate::app::clients::TwitterClient;
use crate::config::credentials::TwitterCredentials;
use crate::config::TweetsConfig;
use crate::core::transform::{flatten_posts, rows_to_csv};
use crate::domain::model::{Post, PostRow};
use crate::domain::ports::{Pipeline, Storage};
use crate::utils::error::Result;

/// Social posts ETL: fetch recent posts matching the configured query and
/// write one CSV row per post.
pub struct TweetsPipeline<S: Storage> {
    storage: S,
    config: TweetsConfig,
    credentials: TwitterCredentials,
    client: TwitterClient,
}

impl<S: Storage> TweetsPipeline<S> {
    pub fn new(
        storage: S,
        config: TweetsConfig,
        credentials: TwitterCredentials,
        client: TwitterClient,
    ) -> Self {
        Self {
            storage,
            config,
            credentials,
            client,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for TweetsPipeline<S> {
    type Raw = Post;
    type Row = PostRow;

    fn name(&self) -> &str {
        "tweets"
    }

    async fn extract(&self) -> Result<Vec<Post>> {
        let posts = self
            .client
            .recent_posts(
                &self.credentials.bearer_token,
                &self.config.query,
                self.config.max_results,
            )
            .await?;

        if posts.is_empty() {
            tracing::warn!("No posts matched query '{}'", self.config.query);
        }

        Ok(posts)
    }

    fn transform(&self, records: Vec<Post>) -> Result<Vec<PostRow>> {
        Ok(flatten_posts(&records))
    }

    async fn load(&self, rows: Vec<PostRow>) -> Result<String> {
        let data = rows_to_csv(&rows)?;
        self.storage.write_file(&self.config.output_file, &data).await
    }
}
