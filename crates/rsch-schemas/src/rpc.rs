//! Request/response envelopes for the four local RPC operations. Field names
//! match a conceptual protobuf schema so either a JSON or a binary transport
//! observes the same shape.

use serde::{Deserialize, Serialize};

use crate::{Flair, Post, PostEntry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsRequest {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsReply {
    #[serde(default)]
    pub error_msg: String,
    #[serde(default)]
    pub posts: Vec<PostEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePostRequest {
    pub post: Post,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulePostReply {
    #[serde(default)]
    pub error_msg: String,
}

/// The only supported edit operation today is deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOperation {
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPostRequest {
    pub operation: EditOperation,
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditPostReply {
    #[serde(default)]
    pub error_msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFlairsRequest {
    pub subreddit: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFlairsReply {
    #[serde(default)]
    pub flairs: Vec<Flair>,
}
