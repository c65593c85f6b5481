//! The remote-submission capability the Dispatcher and the Frontend's flair
//! path consume. `RedditClient` is the production OAuth2 adapter; a
//! deterministic in-memory adapter for tests lives in `rsch-testkit`.

mod client;
mod error;

pub use client::{RedditClient, RedditCredentials};
pub use error::{RedditApiError, RedditErrorItem};

use std::path::Path;

use async_trait::async_trait;
use rsch_schemas::Flair;

/// Operations the core depends on from the remote content API. Implemented
/// once for real (`RedditClient`) and once as a deterministic fake for
/// tests.
#[async_trait]
pub trait RedditCapability: Send + Sync {
    async fn submit_text(
        &self,
        subreddit: &str,
        title: &str,
        body: &str,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError>;

    async fn submit_poll(
        &self,
        subreddit: &str,
        title: &str,
        options: &[String],
        selftext: &str,
        duration_days: i32,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError>;

    async fn submit_image(
        &self,
        subreddit: &str,
        title: &str,
        image_path: &Path,
        nsfw: bool,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError>;

    async fn submit_url(
        &self,
        subreddit: &str,
        title: &str,
        url: &str,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError>;

    async fn list_user_selectable_flairs(&self, subreddit: &str) -> Result<Vec<Flair>, RedditApiError>;
}
