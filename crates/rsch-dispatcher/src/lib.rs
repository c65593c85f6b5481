//! The periodic poster. Wakes on a fixed interval, asks the Store which
//! entries are eligible, submits each through the remote-API capability, and
//! reports the outcome back. A per-entry failure never aborts the cycle.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rsch_remote::RedditCapability;
use rsch_schemas::{PostData, PostEntry};
use rsch_store::StoreHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Tunables read out of `[General]` at Bootstrap.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub step_interval: Duration,
    pub dry_run: bool,
    /// Scratch directory for `Image` materialization, overridable via
    /// `RSCH_TMP_DIR`.
    pub tmp_dir: PathBuf,
}

impl DispatcherConfig {
    pub fn default_tmp_dir() -> PathBuf {
        std::env::var_os("RSCH_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("reddit-scheduler"))
    }
}

pub struct Dispatcher {
    store: StoreHandle,
    remote: Arc<dyn RedditCapability>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(store: StoreHandle, remote: Arc<dyn RedditCapability>, config: DispatcherConfig) -> Self {
        Self { store, remote, config }
    }

    /// Runs the step loop until the process is torn down. Intended to be
    /// driven by a dedicated `tokio::spawn`ed task from Bootstrap.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.step_interval);
        loop {
            ticker.tick().await;
            self.step().await;
        }
    }

    /// One dispatch cycle. Never panics on a per-entry or per-command
    /// failure; logs and proceeds.
    pub async fn step(&self) {
        let entries = match self.store.list_eligible().await {
            Ok(entries) => entries,
            Err(err) => {
                error!(error = ?err, "list_eligible failed, skipping this dispatch cycle");
                return;
            }
        };

        for entry in entries {
            self.submit_one(entry).await;
        }
    }

    async fn submit_one(&self, entry: PostEntry) {
        let id = entry.id;

        if self.config.dry_run {
            info!(id, subreddit = %entry.post.subreddit, "dry run: would submit post");
            self.report_success(id).await;
            return;
        }

        let outcome = self.submit(&entry).await;
        match outcome {
            Ok(()) => self.report_success(id).await,
            Err(message) => self.report_failure(id, message).await,
        }
    }

    async fn submit(&self, entry: &PostEntry) -> Result<(), String> {
        let post = &entry.post;
        let flair_id = post.flair_id.as_deref();

        let result = match &post.data {
            PostData::Text { body } => {
                self.remote
                    .submit_text(&post.subreddit, &post.title, body, flair_id)
                    .await
            }
            PostData::Poll {
                selftext,
                duration_days,
                options,
            } => {
                self.remote
                    .submit_poll(&post.subreddit, &post.title, options, selftext, *duration_days, flair_id)
                    .await
            }
            PostData::Url { url } => {
                self.remote
                    .submit_url(&post.subreddit, &post.title, url, flair_id)
                    .await
            }
            PostData::Image {
                image_bytes,
                extension,
                nsfw,
            } => {
                let path = match self.materialize_image(image_bytes, extension).await {
                    Ok(path) => path,
                    Err(e) => return Err(e),
                };
                self.remote
                    .submit_image(&post.subreddit, &post.title, &path, *nsfw, flair_id)
                    .await
            }
        };

        result.map_err(|err| err.to_string())
    }

    /// Writes `image_bytes` under the scratch directory with a fresh unique
    /// name, since the remote capability takes a path, not a buffer. Not
    /// explicitly cleaned up afterwards — bounded growth is acceptable.
    async fn materialize_image(&self, image_bytes: &[u8], extension: &str) -> Result<PathBuf, String> {
        tokio::fs::create_dir_all(&self.config.tmp_dir)
            .await
            .map_err(|e| format!("-> LocalIoError: creating scratch dir: {e}"))?;

        let path = self.config.tmp_dir.join(format!("{}.{extension}", Uuid::new_v4()));
        tokio::fs::write(&path, image_bytes)
            .await
            .map_err(|e| format!("-> LocalIoError: writing {}: {e}", path.display()))?;
        Ok(path)
    }

    async fn report_success(&self, id: i64) {
        if let Err(err) = self.store.mark_posted(id).await {
            warn!(id, error = ?err, "mark_posted failed; entry stays eligible for retry");
        }
    }

    async fn report_failure(&self, id: i64, message: String) {
        debug!(id, %message, "remote submission failed");
        if let Err(err) = self.store.mark_error(id, message).await {
            warn!(id, error = ?err, "mark_error failed; entry stays eligible for retry");
        }
    }
}
