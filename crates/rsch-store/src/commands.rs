use rsch_schemas::{Post, PostEntry};
use tokio::sync::oneshot;

/// Fixed opaque message for infrastructure failures.
pub const INTERNAL_ERROR_MSG: &str = "internal error. see service logs";

/// Every way a Store call can fail, from the caller's point of view.
#[derive(Debug, thiserror::Error)]
pub enum StoreCallError {
    /// A user-visible validation failure. Returned verbatim to the client.
    #[error("{0}")]
    Validation(String),
    /// An unexpected failure inside the Store. Full detail was already
    /// logged; the caller only ever sees the fixed opaque message.
    #[error("{INTERNAL_ERROR_MSG}")]
    Internal,
    /// The command channel or the reply channel exceeded the lock timeout.
    #[error("service timeout: service may be overloaded")]
    Timeout,
}

/// Commands accepted by the Store actor. Each carries its own single-shot
/// reply channel.
#[derive(Debug)]
pub enum StoreCommand {
    Add {
        post: Box<Post>,
        respond: oneshot::Sender<Result<(), StoreCallError>>,
    },
    ListAll {
        respond: oneshot::Sender<Result<Vec<PostEntry>, StoreCallError>>,
    },
    ListEligible {
        respond: oneshot::Sender<Result<Vec<PostEntry>, StoreCallError>>,
    },
    Delete {
        id: i64,
        respond: oneshot::Sender<Result<(), StoreCallError>>,
    },
    MarkPosted {
        id: i64,
        respond: oneshot::Sender<Result<(), StoreCallError>>,
    },
    MarkError {
        id: i64,
        error: String,
        respond: oneshot::Sender<Result<(), StoreCallError>>,
    },
    /// Drains the queue and closes the database. Does not change observable
    /// semantics of a running instance.
    Stop,
}
