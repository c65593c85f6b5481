//! Shared wire/domain types for the scheduler: the `Post` data model, its
//! stable binary encoding, and the RPC envelopes the daemon's frontend
//! exchanges with the CLI.

use serde::{Deserialize, Serialize};

pub mod rpc;

/// A user-authored content intent, prior to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub subreddit: String,
    /// Absolute seconds since the Unix epoch. Non-zero.
    pub scheduled_time: i64,
    pub data: PostData,
    pub flair_id: Option<String>,
    pub flair_text: Option<String>,
}

/// Exactly one variant is set per `Post` (invariant 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostData {
    Text {
        body: String,
    },
    Poll {
        selftext: String,
        /// 0 = unspecified, use the remote default.
        duration_days: i32,
        options: Vec<String>,
    },
    Image {
        image_bytes: Vec<u8>,
        /// File suffix without the leading dot.
        extension: String,
        nsfw: bool,
    },
    Url {
        url: String,
    },
}

impl PostData {
    /// The denormalized `type` column tag: `text`, `poll`, `image`, or `url`.
    pub fn tag(&self) -> &'static str {
        match self {
            PostData::Text { .. } => "text",
            PostData::Poll { .. } => "poll",
            PostData::Image { .. } => "image",
            PostData::Url { .. } => "url",
        }
    }
}

/// Effective status, derived at read time from `(posted, error)` — see
/// invariant 4 and the Store schema notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    Pending,
    Posted,
    Error,
    Unknown,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PostStatus::Pending => "PENDING",
            PostStatus::Posted => "POSTED",
            PostStatus::Error => "ERROR",
            PostStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// A `Post` plus persistence metadata, as returned by `list_all`/`list_eligible`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostEntry {
    pub id: i64,
    pub post: Post,
    pub status: PostStatus,
    pub error: Option<String>,
}

/// A selectable community flair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flair {
    pub id: String,
    pub text: String,
}

/// Why a `Post` failed Store-side validation (invariants 2 and 3).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid post, client should not have sent this")]
    MissingRequiredField,
    #[error("cannot post empty image post")]
    EmptyImage,
    #[error("poll must have at least 2 options")]
    TooFewPollOptions,
    #[error("cannot post empty url")]
    EmptyUrl,
}

/// Validate a `Post` against invariants 2 and 3. Does not touch the database.
pub fn validate_post(post: &Post) -> Result<(), ValidationError> {
    if post.title.is_empty() || post.subreddit.is_empty() || post.scheduled_time == 0 {
        return Err(ValidationError::MissingRequiredField);
    }
    match &post.data {
        PostData::Text { .. } => {}
        PostData::Url { url } => {
            if url.is_empty() {
                return Err(ValidationError::EmptyUrl);
            }
        }
        PostData::Image { image_bytes, .. } => {
            if image_bytes.is_empty() {
                return Err(ValidationError::EmptyImage);
            }
        }
        PostData::Poll { options, .. } => {
            if options.len() < 2 {
                return Err(ValidationError::TooFewPollOptions);
            }
        }
    }
    Ok(())
}

/// Encode a `PostData` variant to its stable on-disk representation.
pub fn encode_post_data(data: &PostData) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(data)
}

/// Decode a `PostData` variant previously produced by [`encode_post_data`].
pub fn decode_post_data(bytes: &[u8]) -> Result<PostData, bincode::Error> {
    bincode::deserialize(bytes)
}
