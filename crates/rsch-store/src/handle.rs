use std::time::Duration;

use rsch_schemas::{Post, PostEntry};
use tokio::sync::{mpsc, oneshot};

use crate::commands::{StoreCallError, StoreCommand};

/// Default per-call wait bound on both the enqueue and the reply.
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// A cheaply-cloneable front for the Store actor. All mutation observed
/// through a handle is totally ordered by the command channel.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
    timeout: Duration,
}

impl StoreHandle {
    pub(crate) fn new(tx: mpsc::Sender<StoreCommand>) -> Self {
        Self {
            tx,
            timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override the lock timeout (used by tests to exercise saturation
    /// without waiting 10 real seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call<T, F>(&self, build: F) -> Result<T, StoreCallError>
    where
        F: FnOnce(oneshot::Sender<Result<T, StoreCallError>>) -> StoreCommand,
    {
        let (respond, rx) = oneshot::channel();
        let cmd = build(respond);

        match tokio::time::timeout(self.timeout, self.tx.send(cmd)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(StoreCallError::Internal),
            Err(_) => return Err(StoreCallError::Timeout),
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(StoreCallError::Internal),
            Err(_) => Err(StoreCallError::Timeout),
        }
    }

    pub async fn add(&self, post: Post) -> Result<(), StoreCallError> {
        self.call(|respond| StoreCommand::Add {
            post: Box::new(post),
            respond,
        })
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<PostEntry>, StoreCallError> {
        self.call(|respond| StoreCommand::ListAll { respond }).await
    }

    pub async fn list_eligible(&self) -> Result<Vec<PostEntry>, StoreCallError> {
        self.call(|respond| StoreCommand::ListEligible { respond })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreCallError> {
        self.call(|respond| StoreCommand::Delete { id, respond }).await
    }

    pub async fn mark_posted(&self, id: i64) -> Result<(), StoreCallError> {
        self.call(|respond| StoreCommand::MarkPosted { id, respond })
            .await
    }

    pub async fn mark_error(&self, id: i64, error: String) -> Result<(), StoreCallError> {
        self.call(|respond| StoreCommand::MarkError { id, error, respond })
            .await
    }

    /// Drains the queue and closes the database. Idempotent: a second call
    /// after the store thread has exited is a harmless no-op.
    pub async fn stop(&self) {
        let _ = self.tx.send(StoreCommand::Stop).await;
    }
}
