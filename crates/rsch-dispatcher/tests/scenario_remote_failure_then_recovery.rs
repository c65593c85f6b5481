//! Scenario: a post fails remote submission once, then succeeds on the next
//! dispatch step.
//!
//! Invariant under test: `ERROR`-status entries remain eligible and retry;
//! `error` is not cleared on a later successful retry.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rsch_dispatcher::{Dispatcher, DispatcherConfig};
use rsch_remote::{RedditApiError, RedditCapability};
use rsch_schemas::{Flair, Post, PostData, PostStatus};
use rsch_store::Store;

/// Fails its first call, then succeeds on every call after — a deterministic
/// fake for testing the retry path of an adapter trait.
struct FlakyOnceClient {
    calls: AtomicUsize,
}

impl FlakyOnceClient {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl RedditCapability for FlakyOnceClient {
    async fn submit_text(
        &self,
        _subreddit: &str,
        _title: &str,
        _body: &str,
        _flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(RedditApiError::single("RATELIMIT", "you are doing that too much"))
        } else {
            Ok(())
        }
    }

    async fn submit_poll(
        &self,
        _subreddit: &str,
        _title: &str,
        _options: &[String],
        _selftext: &str,
        _duration_days: i32,
        _flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        unreachable!("scenario only submits a text post")
    }

    async fn submit_image(
        &self,
        _subreddit: &str,
        _title: &str,
        _image_path: &Path,
        _nsfw: bool,
        _flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        unreachable!("scenario only submits a text post")
    }

    async fn submit_url(
        &self,
        _subreddit: &str,
        _title: &str,
        _url: &str,
        _flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        unreachable!("scenario only submits a text post")
    }

    async fn list_user_selectable_flairs(&self, _subreddit: &str) -> Result<Vec<Flair>, RedditApiError> {
        unreachable!("scenario does not list flairs")
    }
}

#[tokio::test]
async fn remote_failure_then_recovery() {
    let db = tempfile::NamedTempFile::new().unwrap();
    let (handle, join) = Store::spawn(db.path()).unwrap();

    handle
        .add(Post {
            title: "T".into(),
            subreddit: "s".into(),
            scheduled_time: 1, // well in the past
            data: PostData::Text { body: "b".into() },
            flair_id: None,
            flair_text: None,
        })
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        handle.clone(),
        Arc::new(FlakyOnceClient::new()),
        DispatcherConfig {
            step_interval: Duration::from_secs(1),
            dry_run: false,
            tmp_dir: std::env::temp_dir().join("reddit-scheduler-test"),
        },
    );

    dispatcher.step().await;
    let after_first = handle.list_all().await.unwrap();
    assert_eq!(after_first.len(), 1);
    assert_eq!(after_first[0].status, PostStatus::Error);
    let error_text = after_first[0].error.as_deref().unwrap();
    assert!(error_text.contains("-> RATELIMIT: you are doing that too much"));

    dispatcher.step().await;
    let after_second = handle.list_all().await.unwrap();
    assert_eq!(after_second.len(), 1);
    assert_eq!(after_second[0].status, PostStatus::Posted);
    assert_eq!(
        after_second[0].error.as_deref(),
        Some(error_text),
        "error text is not cleared on a successful retry"
    );

    handle.stop().await;
    join.join().unwrap();
}
