//! Shared test fixtures for the scheduler: a deterministic in-memory
//! `RedditCapability` adapter and a scratch-database helper, kept in their
//! own crate so these fixtures never leak into a production dependency
//! graph.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use rsch_remote::{RedditApiError, RedditCapability};
use rsch_schemas::Flair;

/// One recorded call against a [`FakeRedditClient`], for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    SubmitText {
        subreddit: String,
        title: String,
        body: String,
        flair_id: Option<String>,
    },
    SubmitPoll {
        subreddit: String,
        title: String,
        options: Vec<String>,
        selftext: String,
        duration_days: i32,
        flair_id: Option<String>,
    },
    SubmitImage {
        subreddit: String,
        title: String,
        image_path: PathBuf,
        nsfw: bool,
        flair_id: Option<String>,
    },
    SubmitUrl {
        subreddit: String,
        title: String,
        url: String,
        flair_id: Option<String>,
    },
    ListFlairs {
        subreddit: String,
    },
}

/// Deterministic in-memory stand-in for the real Reddit client. No network,
/// no randomness, no clock reads: every submission succeeds unless a result
/// was queued with [`FakeRedditClient::push_result`], consumed in FIFO order.
#[derive(Default)]
pub struct FakeRedditClient {
    calls: Mutex<Vec<RecordedCall>>,
    scripted_results: Mutex<VecDeque<Result<(), RedditApiError>>>,
    flairs: Mutex<HashMap<String, Vec<Flair>>>,
}

impl FakeRedditClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result of the next `submit_*` call, regardless of variant.
    /// If the queue is empty, submissions default to success.
    pub fn push_result(&self, result: Result<(), RedditApiError>) {
        self.scripted_results.lock().unwrap().push_back(result);
    }

    /// Sets the flair list `list_user_selectable_flairs` returns for `subreddit`.
    pub fn set_flairs(&self, subreddit: impl Into<String>, flairs: Vec<Flair>) {
        self.flairs.lock().unwrap().insert(subreddit.into(), flairs);
    }

    /// Snapshot of every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_result(&self) -> Result<(), RedditApiError> {
        self.scripted_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

#[async_trait]
impl RedditCapability for FakeRedditClient {
    async fn submit_text(
        &self,
        subreddit: &str,
        title: &str,
        body: &str,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        self.record(RecordedCall::SubmitText {
            subreddit: subreddit.into(),
            title: title.into(),
            body: body.into(),
            flair_id: flair_id.map(Into::into),
        });
        self.next_result()
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
        self.record(RecordedCall::SubmitPoll {
            subreddit: subreddit.into(),
            title: title.into(),
            options: options.to_vec(),
            selftext: selftext.into(),
            duration_days,
            flair_id: flair_id.map(Into::into),
        });
        self.next_result()
    }

    async fn submit_image(
        &self,
        subreddit: &str,
        title: &str,
        image_path: &Path,
        nsfw: bool,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        self.record(RecordedCall::SubmitImage {
            subreddit: subreddit.into(),
            title: title.into(),
            image_path: image_path.to_path_buf(),
            nsfw,
            flair_id: flair_id.map(Into::into),
        });
        self.next_result()
    }

    async fn submit_url(
        &self,
        subreddit: &str,
        title: &str,
        url: &str,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        self.record(RecordedCall::SubmitUrl {
            subreddit: subreddit.into(),
            title: title.into(),
            url: url.into(),
            flair_id: flair_id.map(Into::into),
        });
        self.next_result()
    }

    async fn list_user_selectable_flairs(&self, subreddit: &str) -> Result<Vec<Flair>, RedditApiError> {
        self.record(RecordedCall::ListFlairs {
            subreddit: subreddit.into(),
        });
        Ok(self.flairs.lock().unwrap().get(subreddit).cloned().unwrap_or_default())
    }
}

/// A scratch SQLite file living in a freshly created temp directory, for
/// tests that need a real `Store` without touching `$HOME`.
pub struct ScratchDb {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl ScratchDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create scratch dir");
        let path = dir.path().join("database.sqlite");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ScratchDb {
    fn default() -> Self {
        Self::new()
    }
}
