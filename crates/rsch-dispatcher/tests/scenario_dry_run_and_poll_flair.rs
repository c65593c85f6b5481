//! Scenario: dry-run mode marks posts posted without calling the remote API;
//! a poll with a flair reaches the remote capability with the right shape.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rsch_dispatcher::{Dispatcher, DispatcherConfig};
use rsch_remote::{RedditApiError, RedditCapability};
use rsch_schemas::{Flair, Post, PostData, PostStatus};
use rsch_store::Store;

struct AssertNeverCalled;

#[async_trait]
impl RedditCapability for AssertNeverCalled {
    async fn submit_text(&self, _: &str, _: &str, _: &str, _: Option<&str>) -> Result<(), RedditApiError> {
        panic!("dry_run must not call the remote API");
    }
    async fn submit_poll(
        &self,
        _: &str,
        _: &str,
        _: &[String],
        _: &str,
        _: i32,
        _: Option<&str>,
    ) -> Result<(), RedditApiError> {
        panic!("dry_run must not call the remote API");
    }
    async fn submit_image(&self, _: &str, _: &str, _: &Path, _: bool, _: Option<&str>) -> Result<(), RedditApiError> {
        panic!("dry_run must not call the remote API");
    }
    async fn submit_url(&self, _: &str, _: &str, _: &str, _: Option<&str>) -> Result<(), RedditApiError> {
        panic!("dry_run must not call the remote API");
    }
    async fn list_user_selectable_flairs(&self, _: &str) -> Result<Vec<Flair>, RedditApiError> {
        panic!("scenario does not list flairs");
    }
}

#[tokio::test]
async fn dry_run_marks_posted_without_remote_call() {
    let db = tempfile::NamedTempFile::new().unwrap();
    let (handle, join) = Store::spawn(db.path()).unwrap();

    handle
        .add(Post {
            title: "T".into(),
            subreddit: "s".into(),
            scheduled_time: 1,
            data: PostData::Text { body: "b".into() },
            flair_id: None,
            flair_text: None,
        })
        .await
        .unwrap();

    let dispatcher = Dispatcher::new(
        handle.clone(),
        Arc::new(AssertNeverCalled),
        DispatcherConfig {
            step_interval: Duration::from_secs(1),
            dry_run: true,
            tmp_dir: std::env::temp_dir().join("reddit-scheduler-test"),
        },
    );

    dispatcher.step().await;

    let entries = handle.list_all().await.unwrap();
    assert_eq!(entries[0].status, PostStatus::Posted);

    handle.stop().await;
    join.join().unwrap();
}

/// Records the arguments of the one call it expects.
struct RecordingClient {
    called: AtomicBool,
}

#[async_trait]
impl RedditCapability for RecordingClient {
    async fn submit_text(&self, _: &str, _: &str, _: &str, _: Option<&str>) -> Result<(), RedditApiError> {
        panic!("scenario only submits a poll post");
    }

    async fn submit_poll(
        &self,
        subreddit: &str,
        title: &str,
        options: &[String],
        selftext: &str,
        duration_days: i32,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        assert_eq!(subreddit, "s");
        assert_eq!(title, "T2");
        assert_eq!(options, ["a".to_string(), "b".to_string()]);
        assert_eq!(selftext, "x");
        assert_eq!(duration_days, 2);
        assert_eq!(flair_id, Some("F"));
        self.called.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn submit_image(&self, _: &str, _: &str, _: &Path, _: bool, _: Option<&str>) -> Result<(), RedditApiError> {
        panic!("scenario only submits a poll post");
    }
    async fn submit_url(&self, _: &str, _: &str, _: &str, _: Option<&str>) -> Result<(), RedditApiError> {
        panic!("scenario only submits a poll post");
    }
    async fn list_user_selectable_flairs(&self, _: &str) -> Result<Vec<Flair>, RedditApiError> {
        panic!("scenario does not list flairs");
    }
}

#[tokio::test]
async fn poll_with_flair_reaches_remote_with_expected_shape() {
    let db = tempfile::NamedTempFile::new().unwrap();
    let (handle, join) = Store::spawn(db.path()).unwrap();

    handle
        .add(Post {
            title: "T2".into(),
            subreddit: "s".into(),
            scheduled_time: 1,
            data: PostData::Poll {
                selftext: "x".into(),
                duration_days: 2,
                options: vec!["a".into(), "b".into()],
            },
            flair_id: Some("F".into()),
            flair_text: None,
        })
        .await
        .unwrap();

    let client = Arc::new(RecordingClient { called: AtomicBool::new(false) });
    let dispatcher = Dispatcher::new(
        handle.clone(),
        client.clone(),
        DispatcherConfig {
            step_interval: Duration::from_secs(1),
            dry_run: false,
            tmp_dir: std::env::temp_dir().join("reddit-scheduler-test"),
        },
    );

    dispatcher.step().await;
    assert!(client.called.load(Ordering::SeqCst));

    handle.stop().await;
    join.join().unwrap();
}
