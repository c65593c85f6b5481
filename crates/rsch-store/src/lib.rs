//! The Store: a single-writer actor owning the embedded SQLite database.
//!
//! All access is serialized through one bounded command channel processed by
//! one dedicated OS thread. The command enum is a closed sum type, so an
//! unrecognized command is a compile error, not a silently-dropped `else`
//! branch.

mod commands;
mod handle;
mod row;

pub use commands::{StoreCallError, StoreCommand, INTERNAL_ERROR_MSG};
pub use handle::StoreHandle;

use std::path::Path;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use rsch_schemas::{validate_post, PostEntry};

/// Command channel capacity.
const CHANNEL_CAPACITY: usize = 100;

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS Queue (
    id              INTEGER PRIMARY KEY,
    type            TEXT NOT NULL,
    title           TEXT NOT NULL,
    subreddit       TEXT NOT NULL,
    data            BLOB NOT NULL,
    scheduled_time  INTEGER NOT NULL,
    posted          INTEGER NOT NULL,
    flair_id        TEXT,
    error           TEXT
);
";

const SELECT_COLUMNS: &str =
    "id, type, title, subreddit, data, scheduled_time, posted, flair_id, error";

const INSERT_POST: &str = "
INSERT INTO Queue (type, title, subreddit, data, scheduled_time, posted, flair_id)
VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6);
";

const DELETE_POST: &str = "DELETE FROM Queue WHERE id = ?1;";
const MARK_POSTED: &str = "UPDATE Queue SET posted = 1 WHERE id = ?1;";
const MARK_ERROR: &str = "UPDATE Queue SET error = ?2 WHERE id = ?1;";

/// The actor. Owns the connection exclusively; never shared across threads.
pub struct Store {
    conn: Connection,
    rx: mpsc::Receiver<StoreCommand>,
}

impl Store {
    /// Open (or create) the database at `path`, apply the idempotent schema,
    /// and return a cloneable handle plus the join handle of the owning
    /// thread. Callers should `.join()` the handle after sending
    /// [`StoreCommand::Stop`] for a clean shutdown.
    pub fn spawn(path: impl AsRef<Path>) -> Result<(StoreHandle, JoinHandle<()>)> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)
            .with_context(|| format!("failed to open db at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .context("failed to set WAL journal mode")?;
        conn.execute(CREATE_TABLE, [])
            .context("failed to create database table")?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let store = Store { conn, rx };

        let join = std::thread::Builder::new()
            .name("rsch-store".into())
            .spawn(move || {
                info!(path = %path.display(), "store thread starting");
                store.run();
                info!("store thread stopped");
            })
            .context("failed to spawn store thread")?;

        Ok((StoreHandle::new(tx), join))
    }

    fn run(mut self) {
        while let Some(cmd) = self.rx.blocking_recv() {
            debug!(?cmd, "store handling command");
            match cmd {
                StoreCommand::Add { post, respond } => {
                    let result = self.add_post(*post);
                    if let Err(e) = &result {
                        if matches!(e, StoreCallError::Internal) {
                            error!(error = ?e, "failed to insert post");
                        }
                    }
                    let _ = respond.send(result);
                }
                StoreCommand::ListAll { respond } => {
                    let result = self.list(row::QUERY_ALL_WHERE);
                    let _ = respond.send(result);
                }
                StoreCommand::ListEligible { respond } => {
                    let result = self.list(row::QUERY_ELIGIBLE_WHERE);
                    let _ = respond.send(result);
                }
                StoreCommand::Delete { id, respond } => {
                    let result = self.exec_by_id(DELETE_POST, id);
                    let _ = respond.send(result);
                }
                StoreCommand::MarkPosted { id, respond } => {
                    let result = self.exec_by_id(MARK_POSTED, id);
                    let _ = respond.send(result);
                }
                StoreCommand::MarkError { id, error: msg, respond } => {
                    let result = self
                        .conn
                        .execute(MARK_ERROR, rusqlite::params![id, msg])
                        .map(|_| ())
                        .map_err(|e| {
                            error!(error = %e, id, "failed to mark post error");
                            StoreCallError::Internal
                        });
                    let _ = respond.send(result);
                }
                StoreCommand::Stop => {
                    debug!("stopping store");
                    break;
                }
            }
        }
    }

    fn add_post(&self, post: rsch_schemas::Post) -> Result<(), StoreCallError> {
        validate_post(&post).map_err(|e| StoreCallError::Validation(e.to_string()))?;

        let data_blob = rsch_schemas::encode_post_data(&post.data).map_err(|e| {
            error!(error = %e, "failed to encode post data");
            StoreCallError::Internal
        })?;
        let flair_id = post.flair_id.filter(|s| !s.is_empty());

        self.conn
            .execute(
                INSERT_POST,
                rusqlite::params![
                    post.data.tag(),
                    post.title,
                    post.subreddit,
                    data_blob,
                    post.scheduled_time,
                    flair_id,
                ],
            )
            .map(|_| ())
            .map_err(|e| {
                error!(error = %e, "failed to insert post");
                StoreCallError::Internal
            })
    }

    fn list(&self, where_clause: &str) -> Result<Vec<PostEntry>, StoreCallError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM Queue {where_clause};");
        let mut stmt = self.conn.prepare(&sql).map_err(|e| {
            error!(error = %e, "failed to prepare list query");
            StoreCallError::Internal
        })?;
        let rows = stmt.query_map([], row::post_entry_from_row).map_err(|e| {
            error!(error = %e, "failed to run list query");
            StoreCallError::Internal
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| {
                error!(error = %e, "failed to decode a listed row");
                StoreCallError::Internal
            })?);
        }
        Ok(out)
    }

    fn exec_by_id(&self, sql: &str, id: i64) -> Result<(), StoreCallError> {
        self.conn
            .execute(sql, rusqlite::params![id])
            .map(|_| ())
            .map_err(|e| {
                error!(error = %e, id, "failed to execute statement");
                StoreCallError::Internal
            })
    }
}
